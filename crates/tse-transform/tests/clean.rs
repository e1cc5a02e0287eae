//! Tests for schema-driven table assembly.

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};
use tse_model::{CastTarget, ColumnSpec, DType, OpSpec, Operator, Schema, SchemaError};
use tse_transform::{TransformError, clean_with_schema};

fn text_df(columns: Vec<(&str, Vec<Option<&str>>)>) -> DataFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| Series::new(name.into(), values).into_column())
        .collect();
    DataFrame::new(cols).unwrap()
}

fn candidates() -> DataFrame {
    text_df(vec![
        (
            "NM_CANDIDATO",
            vec![Some("  José da Silva "), Some("MARIA ÂNGELA"), None],
        ),
        ("SG_UF", vec![Some("am"), Some("PA"), Some("ro")]),
        ("NR_IDADE_DATA_POSSE", vec![Some("45"), Some(""), Some("x")]),
        ("DS_GENERO", vec![Some("MASCULINO"), Some("FEMININO"), None]),
    ])
}

fn candidates_schema() -> Schema {
    Schema::new([
        (
            "SG_UF",
            ColumnSpec::new("state").with_transform(OpSpec::new(Operator::Upper)),
        ),
        (
            "NM_CANDIDATO",
            ColumnSpec::new("name")
                .with_transform(OpSpec::new(Operator::Strip))
                .with_transform(OpSpec::new(Operator::Unidecode))
                .with_transform(OpSpec::new(Operator::Lower).with_skip_na(true)),
        ),
        (
            "NR_IDADE_DATA_POSSE",
            ColumnSpec::new("age").with_dtype(DType::Int),
        ),
    ])
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

#[test]
fn projects_renames_and_orders_by_schema() {
    let out = clean_with_schema(&candidates(), &candidates_schema()).unwrap();

    assert_eq!(column_names(&out), vec!["state", "name", "age"]);
    assert_eq!(out.height(), 3);

    let state = out.column("state").unwrap().str().unwrap();
    assert_eq!(state.get(0), Some("AM"));
    assert_eq!(state.get(2), Some("RO"));

    let name = out.column("name").unwrap().str().unwrap();
    assert_eq!(name.get(0), Some("jose da silva"));
    assert_eq!(name.get(1), Some("maria angela"));
    assert_eq!(name.get(2), None);

    let age = out.column("age").unwrap().i64().unwrap();
    assert_eq!(age.get(0), Some(45));
    assert_eq!(age.get(1), None); // empty string
    assert_eq!(age.get(2), None); // unparseable
}

#[test]
fn does_not_modify_input_table() {
    let input = candidates();
    let before = input.clone();
    let _ = clean_with_schema(&input, &candidates_schema()).unwrap();
    assert!(input.equals_missing(&before));
}

#[test]
fn repeated_runs_are_identical() {
    let input = candidates();
    let schema = candidates_schema();
    let first = clean_with_schema(&input, &schema).unwrap();
    let second = clean_with_schema(&input, &schema).unwrap();
    assert!(first.equals_missing(&second));
}

#[test]
fn synthesizes_absent_source_columns() {
    let schema = Schema::new([
        ("SG_UF", ColumnSpec::new("state")),
        (
            "DS_COR_RACA",
            ColumnSpec::new("race").with_transform(OpSpec::new(Operator::Lower)),
        ),
        (
            "NR_CPF_CANDIDATO",
            ColumnSpec::new("cpf").with_dtype(DType::Int),
        ),
    ]);

    let out = clean_with_schema(&candidates(), &schema).unwrap();

    assert_eq!(column_names(&out), vec!["state", "race", "cpf"]);
    let race = out.column("race").unwrap();
    assert_eq!(race.dtype(), &DataType::String);
    assert_eq!(race.null_count(), 3);
    let cpf = out.column("cpf").unwrap();
    assert_eq!(cpf.dtype(), &DataType::Int64);
    assert_eq!(cpf.null_count(), 3);
}

#[test]
fn synthesizes_on_empty_table() {
    let schema = Schema::new([("SG_UF", ColumnSpec::new("state"))]);
    let out = clean_with_schema(&DataFrame::empty(), &schema).unwrap();
    assert_eq!(out.height(), 0);
    assert_eq!(column_names(&out), vec!["state"]);
}

#[test]
fn later_source_wins_on_shared_target() {
    let schema = Schema::new([
        ("SG_UF", ColumnSpec::new("label")),
        ("DS_GENERO", ColumnSpec::new("gender")),
        ("NM_CANDIDATO", ColumnSpec::new("label")),
    ]);

    let out = clean_with_schema(&candidates(), &schema).unwrap();

    assert_eq!(column_names(&out), vec!["label", "gender"]);
    let label = out.column("label").unwrap().str().unwrap();
    assert_eq!(label.get(0), Some("  José da Silva "));
}

#[test]
fn dtype_runs_after_transforms() {
    let schema = Schema::new([(
        "NR_IDADE_DATA_POSSE",
        ColumnSpec::new("age")
            .with_transform(OpSpec::new(Operator::Cast(CastTarget::Int)))
            .with_dtype(DType::Float),
    )]);

    let out = clean_with_schema(&candidates(), &schema).unwrap();

    let age = out.column("age").unwrap().f64().unwrap();
    assert_eq!(age.get(0), Some(45.0));
    assert_eq!(age.get(1), None);
    assert_eq!(age.get(2), None);
}

#[test]
fn non_text_input_is_rendered_as_text_first() {
    let input = DataFrame::new(vec![
        Series::new("NR_PARTIDO".into(), vec![Some(13_i64), None, Some(45)]).into_column(),
    ])
    .unwrap();
    let schema = Schema::new([("NR_PARTIDO", ColumnSpec::new("party"))]);

    let out = clean_with_schema(&input, &schema).unwrap();

    let party = out.column("party").unwrap().str().unwrap();
    assert_eq!(party.get(0), Some("13"));
    assert_eq!(party.get(1), None);
    assert_eq!(party.get(2), Some("45"));
}

#[test]
fn empty_schema_is_rejected() {
    let result = clean_with_schema(&candidates(), &Schema::default());
    assert!(matches!(
        result,
        Err(TransformError::Schema(SchemaError::NoColumns))
    ));
}
