//! Table assembly driven by a cleaning schema.

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, Series};
use tracing::debug;
use tse_model::{Schema, SchemaError};

use crate::coerce::{coerce, to_text};
use crate::error::Result;
use crate::operators::apply_transforms;

/// Select, rename, transform and coerce `table` according to `schema`.
///
/// The output holds one column per distinct schema target, in schema order.
/// Source columns missing from `table` are synthesized as all-null text
/// columns; input columns the schema does not list are dropped. When two
/// sources share a target, the later source provides the values and the
/// first occurrence keeps its position.
///
/// # Errors
///
/// Fails with [`SchemaError::NoColumns`] when the schema declares no columns.
pub fn clean_with_schema(table: &DataFrame, schema: &Schema) -> Result<DataFrame> {
    if schema.is_empty() {
        return Err(SchemaError::NoColumns.into());
    }
    let height = table.height();

    let missing: Vec<&str> = schema
        .source_names()
        .into_iter()
        .filter(|source| table.column(source).is_err())
        .collect();
    if !missing.is_empty() {
        debug!(count = missing.len(), columns = ?missing, "synthesizing missing source columns");
    }

    let mut cleaned: Vec<Column> = Vec::with_capacity(schema.len());
    for (source, spec) in schema.columns() {
        let column = match table.column(source) {
            Ok(column) => to_text(column)?,
            Err(_) => missing_text_column(source, height),
        };
        let column = apply_transforms(column, &spec.transforms);
        let column = coerce(column, spec.dtype.as_ref()).with_name(spec.target.as_str().into());

        match cleaned
            .iter_mut()
            .find(|existing| existing.name().as_str() == spec.target)
        {
            Some(slot) => *slot = column,
            None => cleaned.push(column),
        }
    }

    Ok(DataFrame::new(cleaned)?)
}

fn missing_text_column(name: &str, height: usize) -> Column {
    Series::full_null(name.into(), height, &DataType::String).into_column()
}
