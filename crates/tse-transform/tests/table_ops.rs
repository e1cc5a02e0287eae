//! Tests for row filtering and stacking.

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};
use tse_transform::{TransformError, filter_rows_in, stack_frames};

fn frame(columns: Vec<Column>) -> DataFrame {
    DataFrame::new(columns).unwrap()
}

fn text(name: &str, values: &[Option<&str>]) -> Column {
    Series::new(name.into(), values.to_vec()).into_column()
}

#[test]
fn filter_keeps_allowed_states() {
    let df = frame(vec![
        text("state", &[Some("AM"), Some("SP"), None, Some("PA")]),
        text("name", &[Some("a"), Some("b"), Some("c"), Some("d")]),
    ]);
    let allowed = vec!["AM".to_string(), "PA".to_string()];

    let out = filter_rows_in(&df, "state", &allowed).unwrap();

    assert_eq!(out.height(), 2);
    let names = out.column("name").unwrap().str().unwrap();
    assert_eq!(names.get(0), Some("a"));
    assert_eq!(names.get(1), Some("d"));
}

#[test]
fn filter_requires_column() {
    let df = frame(vec![text("name", &[Some("a")])]);
    let result = filter_rows_in(&df, "state", &["AM".to_string()]);
    assert!(matches!(result, Err(TransformError::MissingColumn(name)) if name == "state"));
}

#[test]
fn stack_concatenates_rows() {
    let first = frame(vec![
        text("state", &[Some("AM")]),
        Series::new("age".into(), vec![Some(40_i64)]).into_column(),
    ]);
    let second = frame(vec![
        text("state", &[Some("PA"), Some("RO")]),
        Series::new("age".into(), vec![None, Some(51_i64)]).into_column(),
    ]);

    let out = stack_frames(vec![first, second]).unwrap();

    assert_eq!(out.height(), 3);
    let age = out.column("age").unwrap().i64().unwrap();
    assert_eq!(age.get(0), Some(40));
    assert_eq!(age.get(1), None);
    assert_eq!(age.get(2), Some(51));
}

#[test]
fn stack_renders_mixed_dtypes_as_text() {
    let first = frame(vec![Series::new("age".into(), vec![Some(40_i64)]).into_column()]);
    let second = frame(vec![text("age", &[Some("1.5")])]);

    let out = stack_frames(vec![first, second]).unwrap();

    let age = out.column("age").unwrap();
    assert_eq!(age.dtype(), &DataType::String);
    let values = age.str().unwrap();
    assert_eq!(values.get(0), Some("40"));
    assert_eq!(values.get(1), Some("1.5"));
}

#[test]
fn stack_of_nothing_is_an_error() {
    assert!(matches!(stack_frames(Vec::new()), Err(TransformError::NoFrames)));
}
