//! Vertical concatenation of cleaned tables.

use polars::prelude::{DataFrame, PlSmallStr};
use tracing::warn;

use crate::coerce::to_text;
use crate::error::{Result, TransformError};

/// Stack tables cleaned with the same schema into one.
///
/// A column whose dtype differs between tables (one table's coercion fell
/// back to text) is rendered as text in every table before stacking.
///
/// # Errors
///
/// Fails with [`TransformError::NoFrames`] for an empty input and with a
/// polars error when the column sets differ.
pub fn stack_frames(mut frames: Vec<DataFrame>) -> Result<DataFrame> {
    let Some(first) = frames.first() else {
        return Err(TransformError::NoFrames);
    };

    let mut mixed: Vec<PlSmallStr> = Vec::new();
    for name in first.get_column_names_owned() {
        let mut dtypes = frames
            .iter()
            .filter_map(|frame| frame.column(name.as_str()).ok())
            .map(|column| column.dtype().clone());
        let Some(expected) = dtypes.next() else {
            continue;
        };
        if dtypes.any(|dtype| dtype != expected) {
            mixed.push(name);
        }
    }

    if !mixed.is_empty() {
        warn!(columns = ?mixed, "mixed dtypes across tables, stacking as text");
        for frame in &mut frames {
            for name in &mixed {
                let text = match frame.column(name.as_str()) {
                    Ok(column) => Some(to_text(column)?),
                    Err(_) => None,
                };
                if let Some(text) = text {
                    frame.with_column(text)?;
                }
            }
        }
    }

    let mut remaining = frames.into_iter();
    let Some(mut stacked) = remaining.next() else {
        return Err(TransformError::NoFrames);
    };
    for frame in remaining {
        stacked.vstack_mut(&frame)?;
    }
    Ok(stacked)
}
