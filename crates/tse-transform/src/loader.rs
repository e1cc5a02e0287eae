//! Schema loading from disk.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::{info, warn};
use tse_model::{DType, Operator, Result, Schema, SchemaError};

/// Load a schema document and warn about names that resolved to no-ops.
///
/// # Errors
///
/// Fails when the file cannot be read, has the wrong shape, or declares no
/// columns.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let file = File::open(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let schema = Schema::from_yaml_reader(BufReader::new(file))?;
    let unresolved = report_unresolved(&schema);
    info!(
        path = %path.display(),
        columns = schema.len(),
        unresolved,
        "loaded cleaning schema"
    );
    Ok(schema)
}

/// Log one warning per unknown operator or dtype; returns how many were found.
pub fn report_unresolved(schema: &Schema) -> usize {
    let mut count = 0;
    for (source, spec) in schema.columns() {
        for op in &spec.transforms {
            if let Operator::NoOp(reason) = &op.operator {
                warn!(column = %source, %reason, "operator ignored");
                count += 1;
            }
        }
        if let Some(DType::Unknown(name)) = &spec.dtype {
            warn!(column = %source, dtype = %name, "unknown dtype ignored");
            count += 1;
        }
    }
    count
}
