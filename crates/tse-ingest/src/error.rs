use std::io;
use std::string::FromUtf8Error;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),
    #[error("csv output is not valid utf-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
    #[error("target file '{member}' not found in the zip archive")]
    MemberNotFound { member: String },
    #[error("no CSV found under {prefix}")]
    NoCsvFound { prefix: String },
    #[error("invalid object key: {0}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
