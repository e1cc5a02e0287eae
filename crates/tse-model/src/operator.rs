//! Closed operator and dtype vocabularies.
//!
//! Names coming from a schema document are matched case-insensitively. Any
//! name outside the vocabulary resolves to an explicit no-op variant instead
//! of an error, so a typo in one column never rejects the whole schema.

use std::fmt;

/// Final representation enforced on a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DType {
    /// Nullable text.
    String,
    /// Nullable 64-bit integer.
    Int,
    /// Nullable 64-bit float.
    Float,
    /// Nullable boolean.
    Bool,
    /// A dtype name the engine does not know; coercion leaves the column as is.
    Unknown(String),
}

impl DType {
    /// Resolve a dtype name from a schema document.
    pub fn resolve(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "string" | "str" => DType::String,
            "int" | "int64" | "integer" => DType::Int,
            "float" | "float64" => DType::Float,
            "bool" | "boolean" => DType::Bool,
            _ => DType::Unknown(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DType::String => "string",
            DType::Int => "int",
            DType::Float => "float",
            DType::Bool => "bool",
            DType::Unknown(name) => name.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, DType::Unknown(_))
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Representation targeted by the `cast` operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastTarget {
    String,
    Int,
    Float,
}

impl CastTarget {
    /// Resolve the `to` parameter of a `cast` operator.
    pub fn resolve(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "string" | "str" => Some(CastTarget::String),
            "int" | "int64" | "integer" => Some(CastTarget::Int),
            "float" | "float64" => Some(CastTarget::Float),
            _ => None,
        }
    }

    /// The dtype a cast to this target produces.
    pub fn dtype(self) -> DType {
        match self {
            CastTarget::String => DType::String,
            CastTarget::Int => DType::Int,
            CastTarget::Float => DType::Float,
        }
    }
}

/// Why an operator resolved to a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NoOpReason {
    /// The `op` name is not in the vocabulary (or was absent).
    UnknownOperator(String),
    /// `cast` with a missing or unsupported `to`.
    UnknownCast(Option<String>),
}

impl fmt::Display for NoOpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoOpReason::UnknownOperator(name) if name.is_empty() => {
                write!(f, "operator name is missing")
            }
            NoOpReason::UnknownOperator(name) => write!(f, "unknown operator '{name}'"),
            NoOpReason::UnknownCast(Some(to)) => write!(f, "unsupported cast target '{to}'"),
            NoOpReason::UnknownCast(None) => write!(f, "cast without a 'to' target"),
        }
    }
}

/// A column-level transform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Lower,
    Upper,
    Strip,
    Unidecode,
    Cast(CastTarget),
    NoOp(NoOpReason),
}

impl Operator {
    /// Registry lookup: map an operator name (and the `cast` target, when
    /// present) to its variant.
    pub fn resolve(name: &str, to: Option<&str>) -> Self {
        match name.trim().to_lowercase().as_str() {
            "lower" => Operator::Lower,
            "upper" => Operator::Upper,
            "strip" => Operator::Strip,
            "unidecode" => Operator::Unidecode,
            "cast" => match to.and_then(CastTarget::resolve) {
                Some(target) => Operator::Cast(target),
                None => Operator::NoOp(NoOpReason::UnknownCast(to.map(str::to_string))),
            },
            _ => Operator::NoOp(NoOpReason::UnknownOperator(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operator::Lower => "lower",
            Operator::Upper => "upper",
            Operator::Strip => "strip",
            Operator::Unidecode => "unidecode",
            Operator::Cast(_) => "cast",
            Operator::NoOp(_) => "noop",
        }
    }

    /// Operators that only make sense on text columns.
    pub fn is_text_operator(&self) -> bool {
        matches!(
            self,
            Operator::Lower | Operator::Upper | Operator::Strip | Operator::Unidecode
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Cast(target) => write!(f, "cast(to={})", target.dtype()),
            Operator::NoOp(reason) => write!(f, "noop({reason})"),
            other => write!(f, "{}", other.name()),
        }
    }
}
