//! Polars AnyValue rendering for CSV output.

use polars::prelude::AnyValue;

/// Render a cell for CSV output. Nulls become empty fields, booleans
/// `True`/`False`, integral floats keep a trailing `.0`.
pub fn any_to_csv_field(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_float(f64::from(v)),
        AnyValue::Float64(v) => format_float(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => if b { "True" } else { "False" }.to_string(),
        other => other.to_string(),
    }
}

/// Formats a float the way the TSE exports expect (`2.0`, `1.5`, `0.1`).
///
/// Integral values from `1e16` up are written as plain digits, never in
/// exponent form (`1e16` renders as `10000000000000000`).
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_cells() {
        assert_eq!(any_to_csv_field(AnyValue::Null), "");
        assert_eq!(any_to_csv_field(AnyValue::Int64(-3)), "-3");
        assert_eq!(any_to_csv_field(AnyValue::Float64(2.0)), "2.0");
        assert_eq!(any_to_csv_field(AnyValue::Float64(1.25)), "1.25");
        assert_eq!(any_to_csv_field(AnyValue::Boolean(true)), "True");
        assert_eq!(any_to_csv_field(AnyValue::String("AM")), "AM");
    }

    #[test]
    fn large_integral_floats_use_plain_digits() {
        assert_eq!(format_float(1e15), "1000000000000000.0");
        assert_eq!(format_float(1e16), "10000000000000000");
        assert_eq!(format_float(f64::NAN), "NaN");
    }
}
