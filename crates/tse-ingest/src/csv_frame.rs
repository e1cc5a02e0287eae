//! Text-typed CSV codec.
//!
//! Every cell is read as nullable text. Type interpretation happens later,
//! under the cleaning schema.

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use tracing::{debug, trace};

use crate::encoding::{LATIN_1, decode, encode};
use crate::error::{IngestError, Result};
use crate::polars_utils::any_to_csv_field;

/// Cell tokens read as missing. Matching is exact and case sensitive.
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Delimiter and encoding of a CSV payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub encoding: String,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            encoding: "utf-8".to_string(),
        }
    }
}

impl CsvOptions {
    pub fn new(delimiter: u8, encoding: impl Into<String>) -> Self {
        Self {
            delimiter,
            encoding: encoding.into(),
        }
    }

    /// Semicolon separated Latin-1, as published inside TSE archives.
    pub fn tse_archive() -> Self {
        Self::new(b';', LATIN_1)
    }

    /// Comma separated Latin-1, as written to the raw store.
    pub fn raw_store() -> Self {
        Self::new(b',', LATIN_1)
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }
}

fn is_na_token(cell: &str) -> bool {
    NA_TOKENS.contains(&cell)
}

/// Header names with repeats suffixed `.1`, `.2`, ... in order of appearance.
fn dedupe_headers(record: &StringRecord) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(record.len());
    for raw in record {
        let base = raw.trim_start_matches('\u{feff}').to_string();
        let mut name = base.clone();
        let mut suffix = 0usize;
        while headers.contains(&name) {
            suffix += 1;
            name = format!("{base}.{suffix}");
        }
        headers.push(name);
    }
    headers
}

/// Read CSV bytes into a table of nullable `String` columns.
///
/// Short rows are padded with nulls, extra trailing fields are dropped, and
/// blank lines are skipped. An empty payload yields an empty table.
///
/// # Errors
///
/// Fails on an unknown encoding or malformed CSV.
pub fn read_text_frame(bytes: &[u8], options: &CsvOptions) -> Result<DataFrame> {
    let text = decode(bytes, &options.encoding)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = dedupe_headers(reader.headers()?);
    if headers.is_empty() {
        return Ok(DataFrame::empty());
    }

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    let mut record = StringRecord::new();
    let mut line = 0usize;
    while reader.read_record(&mut record)? {
        line += 1;
        if record.len() == 1 && record.get(0).is_some_and(str::is_empty) {
            continue;
        }
        if record.len() > headers.len() {
            trace!(line, fields = record.len(), "dropping extra fields");
        }
        for (idx, column) in values.iter_mut().enumerate() {
            let cell = record
                .get(idx)
                .filter(|cell| !is_na_token(cell))
                .map(str::to_string);
            column.push(cell);
        }
    }

    let columns: Vec<Column> = headers
        .into_iter()
        .zip(values)
        .map(|(name, column)| Series::new(name.into(), column).into_column())
        .collect();
    let frame = DataFrame::new(columns)?;
    debug!(
        rows = frame.height(),
        columns = frame.width(),
        encoding = %options.encoding,
        "csv read"
    );
    Ok(frame)
}

/// Write a table as CSV with a header row and no index column.
///
/// # Errors
///
/// Fails on an unknown encoding or when a cell cannot be read.
pub fn write_csv(frame: &DataFrame, options: &CsvOptions) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(Vec::new());

    let names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    writer.write_record(&names)?;

    let columns = frame.get_columns();
    let mut row: Vec<String> = Vec::with_capacity(columns.len());
    for idx in 0..frame.height() {
        row.clear();
        for column in columns {
            row.push(any_to_csv_field(column.get(idx)?));
        }
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| IngestError::Io(error.into_error()))?;
    let text = String::from_utf8(bytes)?;
    encode(&text, &options.encoding)
}
