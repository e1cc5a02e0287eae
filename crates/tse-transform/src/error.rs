use polars::prelude::PolarsError;
use thiserror::Error;
use tse_model::SchemaError;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("column not found: {0}")]
    MissingColumn(String),
    #[error("no tables to combine")]
    NoFrames,
}

pub type Result<T> = std::result::Result<T, TransformError>;
