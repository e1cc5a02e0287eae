//! Dtype enforcement.
//!
//! Coercion is best effort. Values that cannot be parsed become null; a
//! failure affecting the column as a whole (a fractional value under an
//! integer dtype, a polars error) is reported as [`CoercionOutcome`] and the
//! caller keeps the original column.

use std::fmt;

use polars::prelude::{Column, DataType, IntoColumn, NamedFrom, PolarsResult, Series};
use tracing::warn;
use tse_model::DType;

/// Why a column was left as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoercionOutcome {
    Unchanged { reason: String },
}

impl CoercionOutcome {
    fn unchanged(reason: impl Into<String>) -> Self {
        CoercionOutcome::Unchanged {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CoercionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercionOutcome::Unchanged { reason } => write!(f, "kept unchanged: {reason}"),
        }
    }
}

/// Coerce `column` to `dtype`, reporting whole-column failures.
///
/// `None` and [`DType::Unknown`] are the identity.
pub fn try_coerce(column: &Column, dtype: Option<&DType>) -> Result<Column, CoercionOutcome> {
    let Some(dtype) = dtype else {
        return Ok(column.clone());
    };
    match dtype {
        DType::String => {
            to_text(column).map_err(|error| CoercionOutcome::unchanged(error.to_string()))
        }
        DType::Int => to_int(column),
        DType::Float => to_float(column),
        DType::Bool => to_bool(column),
        DType::Unknown(_) => Ok(column.clone()),
    }
}

/// Coerce `column` to `dtype`, falling back to the original column.
pub fn coerce(column: Column, dtype: Option<&DType>) -> Column {
    match try_coerce(&column, dtype) {
        Ok(coerced) => coerced,
        Err(outcome) => {
            warn!(
                column = %column.name(),
                dtype = %dtype.map(DType::as_str).unwrap_or("-"),
                %outcome,
                "coercion failed"
            );
            column
        }
    }
}

/// Render a column as nullable text. Nulls stay null.
///
/// # Errors
///
/// Returns the polars error when the cast is not supported.
pub fn to_text(column: &Column) -> PolarsResult<Column> {
    match column.dtype() {
        DataType::String => Ok(column.clone()),
        DataType::Boolean => {
            let values: Vec<Option<&str>> = column
                .bool()?
                .into_iter()
                .map(|value| value.map(|flag| if flag { "True" } else { "False" }))
                .collect();
            Ok(Series::new(column.name().clone(), values).into_column())
        }
        _ => column.cast(&DataType::String),
    }
}

/// Parses a trimmed numeric literal, returning None for empty or invalid text.
fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn text_values(column: &Column) -> Result<Vec<Option<String>>, CoercionOutcome> {
    let text = to_text(column).map_err(|error| CoercionOutcome::unchanged(error.to_string()))?;
    let values = text
        .str()
        .map_err(|error| CoercionOutcome::unchanged(error.to_string()))?;
    Ok(values
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

fn to_int(column: &Column) -> Result<Column, CoercionOutcome> {
    let mut out: Vec<Option<i64>> = Vec::with_capacity(column.len());
    for value in text_values(column)? {
        let Some(raw) = value else {
            out.push(None);
            continue;
        };
        if let Ok(exact) = raw.trim().parse::<i64>() {
            out.push(Some(exact));
            continue;
        }
        match parse_number(&raw) {
            None => out.push(None),
            Some(number) if number.is_nan() => out.push(None),
            Some(number) if is_exact_i64(number) => out.push(Some(number as i64)),
            Some(_) => {
                return Err(CoercionOutcome::unchanged(format!(
                    "value '{raw}' cannot be represented as an integer"
                )));
            }
        }
    }
    Ok(Series::new(column.name().clone(), out).into_column())
}

fn is_exact_i64(number: f64) -> bool {
    number.is_finite()
        && number.fract() == 0.0
        && number >= i64::MIN as f64
        && number < i64::MAX as f64
}

fn to_float(column: &Column) -> Result<Column, CoercionOutcome> {
    let out: Vec<Option<f64>> = text_values(column)?
        .iter()
        .map(|value| {
            value
                .as_deref()
                .and_then(parse_number)
                .filter(|number| !number.is_nan())
        })
        .collect();
    Ok(Series::new(column.name().clone(), out).into_column())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn to_bool(column: &Column) -> Result<Column, CoercionOutcome> {
    let out: Vec<Option<bool>> = text_values(column)?
        .iter()
        .map(|value| value.as_deref().and_then(parse_flag))
        .collect();
    Ok(Series::new(column.name().clone(), out).into_column())
}
