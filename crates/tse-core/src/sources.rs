//! Archive sources document.
//!
//! ```yaml
//! candidates:
//!   2018: data/consulta_cand_2018.zip
//!   2022: data/consulta_cand_2022.zip
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::jobs::ArchiveYearItem;

#[derive(Debug, Default, Deserialize)]
struct SourcesDocument {
    #[serde(default)]
    candidates: Option<Mapping>,
}

/// Archive location per election year, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sources {
    candidates: Vec<(String, String)>,
}

impl Sources {
    /// # Errors
    ///
    /// Fails on malformed YAML or a year without a string path.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text).context("parse sources document")?;
        if value.is_null() {
            return Ok(Self::default());
        }
        let document: SourcesDocument =
            serde_yaml::from_value(value).context("parse sources document")?;
        let mut candidates = Vec::new();
        for (key, value) in document.candidates.unwrap_or_default() {
            let year = match key {
                Value::String(year) => year,
                Value::Number(year) => year.to_string(),
                other => bail!("invalid year key {other:?}"),
            };
            let Value::String(path) = value else {
                bail!("source of year {year} is not a path");
            };
            candidates.push((year, path));
        }
        Ok(Self { candidates })
    }

    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("load {}", path.display()))
    }

    pub fn years(&self) -> Vec<&str> {
        self.candidates.iter().map(|(year, _)| year.as_str()).collect()
    }

    pub fn get(&self, year: &str) -> Option<&str> {
        self.candidates
            .iter()
            .find(|(candidate, _)| candidate == year)
            .map(|(_, path)| path.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Collection items for `years`, or for every year when `years` is empty.
    ///
    /// Requested years without a source are skipped with a warning. Relative
    /// paths are resolved against `base`.
    pub fn items(&self, years: &[String], base: &Path, target: &str) -> Vec<ArchiveYearItem> {
        for year in years {
            if self.get(year).is_none() {
                warn!(year = %year, "no source configured for year");
            }
        }
        self.candidates
            .iter()
            .filter(|(year, _)| years.is_empty() || years.contains(year))
            .map(|(year, path)| {
                ArchiveYearItem::new(year.clone(), resolve_source(base, path))
                    .with_target(target)
            })
            .collect()
    }
}

fn resolve_source(base: &Path, path: &str) -> String {
    if path.contains("://") || Path::new(path).is_absolute() {
        path.to_string()
    } else {
        base.join(path).to_string_lossy().into_owned()
    }
}
