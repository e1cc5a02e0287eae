//! Row filtering on a column's text values.

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};

use crate::coerce::to_text;
use crate::error::{Result, TransformError};

/// Keep the rows whose `column` value is one of `allowed`.
///
/// Matching is exact on the text rendering of the value; nulls never match.
///
/// # Errors
///
/// Fails with [`TransformError::MissingColumn`] when `column` is absent.
pub fn filter_rows_in(table: &DataFrame, column: &str, allowed: &[String]) -> Result<DataFrame> {
    let values = match table.column(column) {
        Ok(values) => to_text(values)?,
        Err(_) => return Err(TransformError::MissingColumn(column.to_string())),
    };
    let keep: Vec<bool> = values
        .str()?
        .into_iter()
        .map(|value| value.is_some_and(|text| allowed.iter().any(|item| item == text)))
        .collect();
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok(table.filter(&mask)?)
}
