//! Raw archive collection and per-year cleaning jobs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use polars::prelude::DataFrame;
use tracing::{debug, info};
use tse_ingest::{
    CsvOptions, LocalStore, candidate_member_name, candidates_key, clean_candidates_key,
    read_member, read_text_frame, resolve_year_csv, write_csv,
};
use tse_model::Schema;
use tse_transform::{clean_with_schema, filter_rows_in, stack_frames};

use crate::batch::{BatchItem, TableSink};

/// Geographic scope of the national candidate file.
pub const DEFAULT_TARGET: &str = "BRASIL";

/// Name of the combined cleaned table in the processed store.
pub const DEFAULT_OUTPUT_NAME: &str = "candidates_all_clean.csv";

/// Output column holding the state code.
pub const DEFAULT_STATE_COLUMN: &str = "state";

/// States of the Legal Amazon.
pub const AMAZON_STATES: &[&str] = &["AC", "AM", "AP", "MA", "MT", "PA", "RO", "RR", "TO"];

const REMOTE_SCHEMES: &[&str] = &["http://", "https://", "gs://"];

/// One election year's archive to extract into the raw store.
#[derive(Debug, Clone)]
pub struct ArchiveYearItem {
    pub year: String,
    /// Local path of the year's ZIP archive.
    pub source: String,
    pub target: String,
}

impl ArchiveYearItem {
    pub fn new(year: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            source: source.into(),
            target: DEFAULT_TARGET.to_string(),
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }
}

impl BatchItem for ArchiveYearItem {
    type Fetched = Vec<u8>;

    fn id(&self) -> &str {
        &self.year
    }

    fn fetch(&self) -> Result<Vec<u8>> {
        if REMOTE_SCHEMES
            .iter()
            .any(|scheme| self.source.starts_with(scheme))
        {
            bail!(
                "unsupported source '{}': only local archive paths can be read",
                self.source
            );
        }
        let bytes =
            fs::read(Path::new(&self.source)).with_context(|| format!("read {}", self.source))?;
        debug!(source = %self.source, bytes = bytes.len(), "archive read");
        Ok(bytes)
    }

    fn transform(&self, archive: Vec<u8>) -> Result<DataFrame> {
        let member = candidate_member_name(&self.source, &self.year, &self.target);
        let bytes = read_member(&archive, &member)
            .with_context(|| format!("extract {member} from {}", self.source))?;
        let frame = read_text_frame(&bytes, &CsvOptions::tse_archive())
            .with_context(|| format!("parse {member}"))?;
        info!(member = %member, rows = frame.height(), "archive table parsed");
        Ok(frame)
    }
}

/// Writes each collected year as `<year>/candidates_<year>.csv`.
#[derive(Debug)]
pub struct RawSink {
    store: LocalStore,
}

impl RawSink {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }
}

impl TableSink for RawSink {
    fn store(&mut self, id: &str, table: DataFrame) -> Result<()> {
        let key = candidates_key(id);
        let bytes = write_csv(&table, &CsvOptions::raw_store())
            .with_context(|| format!("encode {key}"))?;
        self.store
            .put(&key, &bytes)
            .with_context(|| format!("upload {key}"))?;
        Ok(())
    }
}

/// Keeps only rows whose `column` value is one of `allowed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateFilter {
    pub column: String,
    pub allowed: Vec<String>,
}

impl StateFilter {
    pub fn new(column: impl Into<String>, allowed: Vec<String>) -> Self {
        Self {
            column: column.into(),
            allowed,
        }
    }

    pub fn amazon() -> Self {
        Self::new(
            DEFAULT_STATE_COLUMN,
            AMAZON_STATES.iter().map(|state| (*state).to_string()).collect(),
        )
    }
}

/// Cleans one year prefix of the raw store.
#[derive(Debug, Clone)]
pub struct CleanYearItem<'a> {
    year: String,
    prefix: String,
    raw: &'a LocalStore,
    schema: &'a Schema,
    filter: Option<&'a StateFilter>,
}

impl<'a> CleanYearItem<'a> {
    /// `prefix` is a store prefix such as `"2022/"`.
    pub fn new(prefix: &str, raw: &'a LocalStore, schema: &'a Schema) -> Self {
        Self {
            year: prefix.trim_end_matches('/').to_string(),
            prefix: prefix.to_string(),
            raw,
            schema,
            filter: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Option<&'a StateFilter>) -> Self {
        self.filter = filter;
        self
    }
}

impl BatchItem for CleanYearItem<'_> {
    type Fetched = Vec<u8>;

    fn id(&self) -> &str {
        &self.year
    }

    fn fetch(&self) -> Result<Vec<u8>> {
        let key = resolve_year_csv(self.raw, &self.prefix)?;
        info!(key = %key, "reading raw table");
        self.raw
            .get(&key)
            .with_context(|| format!("download {key}"))
    }

    fn transform(&self, bytes: Vec<u8>) -> Result<DataFrame> {
        let raw = read_text_frame(&bytes, &CsvOptions::raw_store())
            .with_context(|| format!("parse raw table for {}", self.year))?;
        let cleaned = clean_with_schema(&raw, self.schema)?;
        let Some(filter) = self.filter else {
            return Ok(cleaned);
        };
        let before = cleaned.height();
        let filtered = filter_rows_in(&cleaned, &filter.column, &filter.allowed)
            .with_context(|| format!("filter {} on {}", self.year, filter.column))?;
        info!(
            column = %filter.column,
            before,
            after = filtered.height(),
            "state filter applied"
        );
        Ok(filtered)
    }
}

/// One cleaning item per year prefix of `raw`, in sorted order.
///
/// # Errors
///
/// Fails when the raw store cannot be listed.
pub fn clean_items<'a>(
    raw: &'a LocalStore,
    schema: &'a Schema,
    filter: Option<&'a StateFilter>,
) -> Result<Vec<CleanYearItem<'a>>> {
    let prefixes = raw
        .list_prefixes()
        .with_context(|| format!("list {}", raw.root().display()))?;
    Ok(prefixes
        .iter()
        .map(|prefix| CleanYearItem::new(prefix, raw, schema).with_filter(filter))
        .collect())
}

/// Collects cleaned years, optionally writing each to the processed store.
#[derive(Debug)]
pub struct CleanSink {
    processed: LocalStore,
    encoding: String,
    per_year: bool,
    frames: Vec<DataFrame>,
}

impl CleanSink {
    pub fn new(processed: LocalStore, encoding: impl Into<String>) -> Self {
        Self {
            processed,
            encoding: encoding.into(),
            per_year: false,
            frames: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_per_year(mut self, per_year: bool) -> Self {
        self.per_year = per_year;
        self
    }

    pub fn frames(&self) -> &[DataFrame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<DataFrame> {
        self.frames
    }
}

impl TableSink for CleanSink {
    fn store(&mut self, id: &str, table: DataFrame) -> Result<()> {
        if self.per_year {
            let key = clean_candidates_key(id);
            let options = CsvOptions::default().with_encoding(self.encoding.clone());
            let bytes = write_csv(&table, &options).with_context(|| format!("encode {key}"))?;
            self.processed
                .put(&key, &bytes)
                .with_context(|| format!("upload {key}"))?;
        }
        self.frames.push(table);
        Ok(())
    }
}

/// Stack `frames` and write them to `output_name` in `processed`.
///
/// Returns the number of rows written.
///
/// # Errors
///
/// Fails when there are no frames, or when stacking, encoding or writing fails.
pub fn write_combined(
    frames: Vec<DataFrame>,
    processed: &LocalStore,
    output_name: &str,
    encoding: &str,
) -> Result<usize> {
    if frames.is_empty() {
        bail!("no data to combine: every year failed or the raw store is empty");
    }
    let years = frames.len();
    let combined = stack_frames(frames).context("stack cleaned years")?;
    let options = CsvOptions::default().with_encoding(encoding);
    let bytes = write_csv(&combined, &options).with_context(|| format!("encode {output_name}"))?;
    processed
        .put(output_name, &bytes)
        .with_context(|| format!("upload {output_name}"))?;
    info!(
        output = output_name,
        years,
        rows = combined.height(),
        "combined table written"
    );
    Ok(combined.height())
}
