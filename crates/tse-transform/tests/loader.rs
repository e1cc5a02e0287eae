//! Tests for loading schemas from disk.

use std::fs;

use tse_model::SchemaError;
use tse_transform::{load_schema, report_unresolved};

#[test]
fn loads_schema_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cleaning_schema.yaml");
    fs::write(
        &path,
        "meta:\n  output:\n    encoding: latin-1\ncolumns:\n  SG_UF:\n    target: state\n    dtype: weird\n    transforms:\n      - op: upper\n      - op: shout\n",
    )
    .unwrap();

    let schema = load_schema(&path).unwrap();

    assert_eq!(schema.target_names(), vec!["state"]);
    assert_eq!(schema.output_encoding(), "latin-1");
    assert_eq!(report_unresolved(&schema), 2);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_schema(&dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(SchemaError::Io { .. })));
}

#[test]
fn empty_columns_fail_before_any_table_io() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.yaml");
    fs::write(&path, "columns: {}\n").unwrap();
    assert!(matches!(load_schema(&path), Err(SchemaError::NoColumns)));
}
