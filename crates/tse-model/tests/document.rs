//! Tests for schema document parsing.

use tse_model::{CastTarget, DType, NoOpReason, Operator, Schema, SchemaError};

const CANDIDATES_SCHEMA: &str = r#"
meta:
  output:
    encoding: latin-1
columns:
  NM_CANDIDATO:
    target: name
    transforms:
      - op: strip
      - op: unidecode
      - op: Lower
        skip_na: true
  SG_UF:
    target: state
    transforms:
      - op: upper
  NR_IDADE_DATA_POSSE:
    target: age
    dtype: int
  DS_COR_RACA:
    target: race
  ST_REELEICAO:
    target: reelection
    dtype: Boolean
  VR_DESPESA_MAX_CAMPANHA:
    target: max_spend
    transforms:
      - op: cast
        to: float
"#;

#[test]
fn parses_columns_in_declaration_order() {
    let schema = Schema::from_yaml_str(CANDIDATES_SCHEMA).unwrap();

    assert_eq!(
        schema.source_names(),
        vec![
            "NM_CANDIDATO",
            "SG_UF",
            "NR_IDADE_DATA_POSSE",
            "DS_COR_RACA",
            "ST_REELEICAO",
            "VR_DESPESA_MAX_CAMPANHA",
        ]
    );
    assert_eq!(
        schema.target_names(),
        vec!["name", "state", "age", "race", "reelection", "max_spend"]
    );
    assert_eq!(schema.output_encoding(), "latin-1");
}

#[test]
fn resolves_operators_and_dtypes() {
    let schema = Schema::from_yaml_str(CANDIDATES_SCHEMA).unwrap();

    let name = schema.get("NM_CANDIDATO").unwrap();
    let operators: Vec<&Operator> = name.transforms.iter().map(|op| &op.operator).collect();
    assert_eq!(
        operators,
        vec![&Operator::Strip, &Operator::Unidecode, &Operator::Lower]
    );
    assert!(name.transforms[2].skip_na);
    assert!(!name.transforms[0].skip_na);
    assert_eq!(name.dtype, None);

    assert_eq!(
        schema.get("NR_IDADE_DATA_POSSE").unwrap().dtype,
        Some(DType::Int)
    );
    assert_eq!(schema.get("ST_REELEICAO").unwrap().dtype, Some(DType::Bool));
    assert_eq!(
        schema.get("VR_DESPESA_MAX_CAMPANHA").unwrap().transforms[0].operator,
        Operator::Cast(CastTarget::Float)
    );
}

#[test]
fn target_defaults_to_source_name() {
    let schema = Schema::from_yaml_str(
        r#"
columns:
  SG_UF: {}
  NM_URNA_CANDIDATO:
"#,
    )
    .unwrap();

    assert_eq!(schema.target_names(), vec!["SG_UF", "NM_URNA_CANDIDATO"]);
    assert_eq!(schema.output_encoding(), "utf-8");
}

#[test]
fn unknown_names_are_kept_as_noop() {
    let schema = Schema::from_yaml_str(
        r#"
columns:
  a:
    dtype: weird
    transforms:
      - op: frobnicate
      - op: cast
        to: date
"#,
    )
    .unwrap();

    let spec = schema.get("a").unwrap();
    assert_eq!(spec.dtype, Some(DType::Unknown("weird".to_string())));
    assert_eq!(
        spec.transforms[0].operator,
        Operator::NoOp(NoOpReason::UnknownOperator("frobnicate".to_string()))
    );
    assert_eq!(
        spec.transforms[1].operator,
        Operator::NoOp(NoOpReason::UnknownCast(Some("date".to_string())))
    );
}

#[test]
fn empty_columns_are_rejected() {
    assert!(matches!(
        Schema::from_yaml_str("columns: {}\n"),
        Err(SchemaError::NoColumns)
    ));
    assert!(matches!(
        Schema::from_yaml_str("meta:\n  output:\n    encoding: utf-8\n"),
        Err(SchemaError::NoColumns)
    ));
    assert!(matches!(
        Schema::from_yaml_str("columns:\n"),
        Err(SchemaError::NoColumns)
    ));
}

#[test]
fn malformed_column_fails_fast() {
    let result = Schema::from_yaml_str(
        r#"
columns:
  a:
    transforms: lower
"#,
    );

    match result {
        Err(SchemaError::InvalidColumn { column, .. }) => assert_eq!(column, "a"),
        other => panic!("expected InvalidColumn, got {other:?}"),
    }
}

#[test]
fn numeric_keys_become_column_names() {
    let schema = Schema::from_yaml_str("columns:\n  2024:\n    target: year\n").unwrap();
    assert_eq!(schema.source_names(), vec!["2024"]);
}

#[test]
fn bundled_cleaning_schema_resolves_fully() {
    let schema = Schema::from_yaml_str(include_str!("../../../configs/cleaning_schema.yaml"))
        .unwrap();

    assert_eq!(schema.output_encoding(), "utf-8");
    assert_eq!(schema.target_names()[..2], ["year", "state"]);
    for (source, spec) in schema.columns() {
        assert!(spec.dtype.as_ref().is_none_or(DType::is_known), "{source}");
        assert!(
            spec.transforms
                .iter()
                .all(|op| !matches!(op.operator, Operator::NoOp(_))),
            "{source}"
        );
    }
}

#[test]
fn repeated_column_keeps_first_position_and_last_spec() {
    let schema = Schema::from_yaml_str(
        "columns:\n  a:\n    target: x\n  b: {}\n  a:\n    target: y\n",
    )
    .unwrap();

    assert_eq!(schema.source_names(), vec!["a", "b"]);
    assert_eq!(schema.target_names(), vec!["y", "b"]);
}

#[test]
fn blank_document_has_no_columns() {
    assert!(matches!(
        Schema::from_yaml_str("~\n"),
        Err(SchemaError::NoColumns)
    ));
}
