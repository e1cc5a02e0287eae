use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema has no 'columns' section")]
    NoColumns,
    #[error("invalid schema document: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid column '{column}': {source}")]
    InvalidColumn {
        column: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unsupported column key: {0}")]
    InvalidKey(String),
    #[error("read schema {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
