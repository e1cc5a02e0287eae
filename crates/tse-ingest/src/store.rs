//! Named blob store backed by a local directory.
//!
//! Keys are `/`-separated relative paths (`2022/candidates_2022.csv`). A key
//! prefix is its first segment followed by `/`.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::error::{IngestError, Result};

/// Strip a `gs://` scheme and trailing slashes from a bucket name.
pub fn normalize_bucket_name(bucket: &str) -> String {
    bucket
        .trim()
        .trim_start_matches("gs://")
        .trim_end_matches('/')
        .to_string()
}

/// Canonical raw key of a year: `<year>/candidates_<year>.csv`.
pub fn candidates_key(year: &str) -> String {
    format!("{year}/candidates_{year}.csv")
}

/// Per-year cleaned key: `<year>/candidates_<year>_clean.csv`.
pub fn clean_candidates_key(year: &str) -> String {
    format!("{year}/candidates_{year}_clean.csv")
}

/// Key of a year's CSV under `prefix`.
///
/// The canonical `candidates_<year>.csv` wins; otherwise the first key under
/// the prefix with a `.csv` extension (any case), in sorted order.
///
/// # Errors
///
/// Returns [`IngestError::NoCsvFound`] when the prefix holds no CSV.
pub fn resolve_year_csv(store: &LocalStore, prefix: &str) -> Result<String> {
    let year = prefix.trim_end_matches('/');
    let canonical = candidates_key(year);
    if store.exists(&canonical) {
        return Ok(canonical);
    }
    let fallback = store
        .list(prefix)?
        .into_iter()
        .find(|key| key.to_ascii_lowercase().ends_with(".csv"));
    match fallback {
        Some(key) => {
            debug!(prefix, key = %key, "canonical csv missing, using first csv");
            Ok(key)
        }
        None => Err(IngestError::NoCsvFound {
            prefix: prefix.to_string(),
        }),
    }
}

#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// A store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open a store for a bucket name, resolved under `base`.
    pub fn for_bucket(base: &Path, bucket: &str) -> Self {
        Self::new(base.join(normalize_bucket_name(bucket)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let valid = !key.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !valid {
            return Err(IngestError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }

    /// # Errors
    ///
    /// Fails when the key is invalid or the blob cannot be read.
    pub fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key)?;
        let bytes = fs::read(&path)?;
        debug!(key, bytes = bytes.len(), "blob read");
        Ok(bytes)
    }

    /// Store `bytes` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Fails when the key is invalid or the blob cannot be written.
    pub fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        info!(key, bytes = bytes.len(), root = %self.root.display(), "blob stored");
        Ok(())
    }

    pub fn exists(&self, key: &str) -> bool {
        self.path_for(key).is_ok_and(|path| path.is_file())
    }

    /// Top-level prefixes (`"2018/"`, `"2022/"`), sorted.
    ///
    /// # Errors
    ///
    /// Fails when the store root cannot be listed. A missing root is empty.
    pub fn list_prefixes(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };
        let mut prefixes = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                prefixes.push(format!("{}/", entry.file_name().to_string_lossy()));
            }
        }
        prefixes.sort();
        Ok(prefixes)
    }

    /// All keys starting with `prefix`, sorted.
    ///
    /// # Errors
    ///
    /// Fails when a directory under the prefix cannot be listed.
    pub fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        collect_keys(&self.root, "", &mut keys)?;
        keys.retain(|key| key.starts_with(prefix));
        keys.sort();
        Ok(keys)
    }
}

fn collect_keys(dir: &Path, key_prefix: &str, keys: &mut Vec<String>) -> Result<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(error) => return Err(error.into()),
    };
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let key = format!("{key_prefix}{name}");
        if entry.file_type()?.is_dir() {
            collect_keys(&entry.path(), &format!("{key}/"), keys)?;
        } else {
            keys.push(key);
        }
    }
    Ok(())
}
