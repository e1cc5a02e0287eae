//! Tests for operator dispatch.

use polars::prelude::{Column, DataType, IntoColumn, NamedFrom, Series};
use tse_model::{CastTarget, NoOpReason, OpSpec, Operator};
use tse_transform::{apply_operator, apply_transforms};

fn text_column(values: &[Option<&str>]) -> Column {
    Series::new("NM_CANDIDATO".into(), values.to_vec()).into_column()
}

fn strings(column: &Column) -> Vec<Option<String>> {
    column
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect()
}

#[test]
fn text_operators_keep_missing_values() {
    let input = text_column(&[Some(" Ana "), None, Some("")]);

    let lower = apply_operator(input.clone(), &OpSpec::new(Operator::Lower));
    assert_eq!(
        strings(&lower),
        vec![Some(" ana ".to_string()), None, Some(String::new())]
    );

    let upper = apply_operator(input.clone(), &OpSpec::new(Operator::Upper));
    assert_eq!(
        strings(&upper),
        vec![Some(" ANA ".to_string()), None, Some(String::new())]
    );

    let strip = apply_operator(input, &OpSpec::new(Operator::Strip));
    assert_eq!(
        strings(&strip),
        vec![Some("Ana".to_string()), None, Some(String::new())]
    );
}

#[test]
fn skip_na_does_not_change_text_operator_output() {
    let input = text_column(&[Some("  São Luís "), None]);
    for operator in [Operator::Lower, Operator::Upper, Operator::Strip] {
        let plain = apply_operator(input.clone(), &OpSpec::new(operator.clone()));
        let skipping = apply_operator(
            input.clone(),
            &OpSpec::new(operator.clone()).with_skip_na(true),
        );
        assert_eq!(strings(&plain), strings(&skipping), "operator {operator}");
    }
}

#[test]
fn unidecode_drops_characters_without_ascii_form() {
    let input = text_column(&[Some("a\u{10FFFD}b"), Some("Jos\u{E9}\u{10FFFD}")]);
    let out = apply_operator(input, &OpSpec::new(Operator::Unidecode));
    assert_eq!(
        strings(&out),
        vec![Some("ab".to_string()), Some("Jose".to_string())]
    );
}

#[test]
fn unidecode_transliterates() {
    let input = text_column(&[Some("JOÃO GONÇALVES"), Some("Ñandú"), None]);
    let out = apply_operator(input, &OpSpec::new(Operator::Unidecode));
    assert_eq!(
        strings(&out),
        vec![
            Some("JOAO GONCALVES".to_string()),
            Some("Nandu".to_string()),
            None
        ]
    );
}

#[test]
fn unknown_operator_is_noop() {
    let input = text_column(&[Some("Ana"), None]);
    let op = OpSpec::new(Operator::resolve("frobnicate", None));
    assert_eq!(
        op.operator,
        Operator::NoOp(NoOpReason::UnknownOperator("frobnicate".to_string()))
    );

    let out = apply_operator(input.clone(), &op);
    assert_eq!(strings(&out), strings(&input));
}

#[test]
fn cast_with_unknown_target_is_noop() {
    let input = text_column(&[Some("12")]);
    let out = apply_operator(input.clone(), &OpSpec::new(Operator::resolve("cast", Some("date"))));
    assert_eq!(out.dtype(), &DataType::String);
    assert_eq!(strings(&out), strings(&input));
}

#[test]
fn transforms_apply_in_order() {
    let input = text_column(&[Some("  maria josé  "), None]);
    let transforms = vec![
        OpSpec::new(Operator::Strip),
        OpSpec::new(Operator::Upper),
        OpSpec::new(Operator::Unidecode),
    ];

    let out = apply_transforms(input, &transforms);
    assert_eq!(strings(&out), vec![Some("MARIA JOSE".to_string()), None]);
}

#[test]
fn text_operator_after_cast_passes_through() {
    let input = text_column(&[Some("10"), Some("x")]);
    let transforms = vec![
        OpSpec::new(Operator::Cast(CastTarget::Int)),
        OpSpec::new(Operator::Lower),
    ];

    let out = apply_transforms(input, &transforms);
    assert_eq!(out.dtype(), &DataType::Int64);
    let values = out.i64().unwrap();
    assert_eq!(values.get(0), Some(10));
    assert_eq!(values.get(1), None);
}

#[test]
fn cast_to_string_after_int_renders_digits() {
    let input = text_column(&[Some("007"), None]);
    let transforms = vec![
        OpSpec::new(Operator::Cast(CastTarget::Int)),
        OpSpec::new(Operator::Cast(CastTarget::String)),
    ];

    let out = apply_transforms(input, &transforms);
    assert_eq!(strings(&out), vec![Some("7".to_string()), None]);
}
