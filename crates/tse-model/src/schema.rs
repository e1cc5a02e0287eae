//! Typed cleaning schema.

use crate::operator::{DType, Operator};

/// Encoding used for output files when the schema does not declare one.
pub const DEFAULT_OUTPUT_ENCODING: &str = "utf-8";

/// One transform step of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpSpec {
    pub operator: Operator,
    /// Declared NA handling. For `lower`, `upper` and `strip` the output is the
    /// same either way; missing values are never touched.
    pub skip_na: bool,
}

impl OpSpec {
    pub fn new(operator: Operator) -> Self {
        Self {
            operator,
            skip_na: false,
        }
    }

    #[must_use]
    pub fn with_skip_na(mut self, skip_na: bool) -> Self {
        self.skip_na = skip_na;
        self
    }
}

/// How a single source column becomes an output column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Output column name.
    pub target: String,
    /// Final representation; `None` leaves the column as text.
    pub dtype: Option<DType>,
    /// Applied left to right before coercion.
    pub transforms: Vec<OpSpec>,
}

impl ColumnSpec {
    /// A pass-through spec writing to `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            dtype: None,
            transforms: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = Some(dtype);
        self
    }

    #[must_use]
    pub fn with_transform(mut self, op: OpSpec) -> Self {
        self.transforms.push(op);
        self
    }
}

/// Ordered mapping from source column name to [`ColumnSpec`].
///
/// Iteration order is declaration order and drives the output column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<(String, ColumnSpec)>,
    output_encoding: String,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            output_encoding: DEFAULT_OUTPUT_ENCODING.to_string(),
        }
    }
}

impl Schema {
    /// Build a schema from `(source, spec)` pairs.
    ///
    /// A repeated source name replaces the earlier spec but keeps its position.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, ColumnSpec)>,
        S: Into<String>,
    {
        let mut schema = Self::default();
        for (source, spec) in columns {
            schema.insert(source, spec);
        }
        schema
    }

    #[must_use]
    pub fn with_output_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.output_encoding = encoding.into();
        self
    }

    pub fn insert(&mut self, source: impl Into<String>, spec: ColumnSpec) {
        let source = source.into();
        if let Some(slot) = self.columns.iter_mut().find(|(name, _)| *name == source) {
            slot.1 = spec;
        } else {
            self.columns.push((source, spec));
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnSpec)> {
        self.columns
            .iter()
            .map(|(source, spec)| (source.as_str(), spec))
    }

    pub fn get(&self, source: &str) -> Option<&ColumnSpec> {
        self.columns
            .iter()
            .find(|(name, _)| name == source)
            .map(|(_, spec)| spec)
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(source, _)| source.as_str()).collect()
    }

    /// Output column names in output order, without repeats.
    pub fn target_names(&self) -> Vec<&str> {
        let mut targets: Vec<&str> = Vec::with_capacity(self.columns.len());
        for (_, spec) in &self.columns {
            if !targets.contains(&spec.target.as_str()) {
                targets.push(spec.target.as_str());
            }
        }
        targets
    }

    pub fn output_encoding(&self) -> &str {
        &self.output_encoding
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
