//! Operator dispatch for column transforms.

use std::borrow::Cow;

use deunicode::deunicode_with_tofu;
use polars::prelude::{Column, DataType, IntoColumn, NamedFrom, Series};
use tracing::{debug, warn};
use tse_model::{OpSpec, Operator};

use crate::coerce::coerce;

/// Apply one operator to a column.
///
/// Never fails: unknown operators pass the column through, and text operators
/// leave non-text columns untouched. `unidecode` drops characters without an
/// ASCII form.
pub fn apply_operator(column: Column, op: &OpSpec) -> Column {
    match &op.operator {
        Operator::Lower => map_text(column, &op.operator, |value| {
            Cow::Owned(value.to_lowercase())
        }),
        Operator::Upper => map_text(column, &op.operator, |value| {
            Cow::Owned(value.to_uppercase())
        }),
        Operator::Strip => map_text(column, &op.operator, |value| Cow::Borrowed(value.trim())),
        Operator::Unidecode => map_text(column, &op.operator, |value| {
            if value.is_ascii() {
                Cow::Borrowed(value)
            } else {
                Cow::Owned(deunicode_with_tofu(value, ""))
            }
        }),
        Operator::Cast(target) => coerce(column, Some(&target.dtype())),
        Operator::NoOp(reason) => {
            debug!(column = %column.name(), %reason, "operator skipped");
            column
        }
    }
}

/// Apply operators left to right, each receiving the previous output.
pub fn apply_transforms(column: Column, transforms: &[OpSpec]) -> Column {
    transforms.iter().fold(column, apply_operator)
}

fn map_text<F>(column: Column, operator: &Operator, mut f: F) -> Column
where
    F: for<'a> FnMut(&'a str) -> Cow<'a, str>,
{
    if column.dtype() != &DataType::String {
        warn!(
            column = %column.name(),
            dtype = %column.dtype(),
            %operator,
            "text operator on non-text column"
        );
        return column;
    }
    let mapped: Result<Vec<Option<String>>, _> = column.str().map(|values| {
        values
            .into_iter()
            .map(|value| value.map(|text| f(text).into_owned()))
            .collect()
    });
    match mapped {
        Ok(values) => Series::new(column.name().clone(), values).into_column(),
        Err(error) => {
            warn!(column = %column.name(), %operator, %error, "text operator failed");
            column
        }
    }
}
