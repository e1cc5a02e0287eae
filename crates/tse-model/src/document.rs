//! Schema document parsing.
//!
//! The YAML document is deserialized into plain serde structs, then resolved
//! into [`Schema`]. Column order in the `columns` mapping is preserved. A
//! repeated column key keeps its first position and takes the last spec.

use std::fmt;
use std::io::Read;

use serde::Deserialize;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde_yaml::Value;

use crate::error::{Result, SchemaError};
use crate::operator::{DType, Operator};
use crate::schema::{ColumnSpec, DEFAULT_OUTPUT_ENCODING, OpSpec, Schema};

#[derive(Debug, Default, Deserialize)]
struct SchemaDocument {
    #[serde(default)]
    meta: Option<MetaDocument>,
    #[serde(default, deserialize_with = "column_entries")]
    columns: Option<Vec<(Value, Value)>>,
}

/// Reads `columns` as raw entries so duplicate keys survive deserialization.
fn column_entries<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Vec<(Value, Value)>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Option<Vec<(Value, Value)>>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of source column names")
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<Value, Value>()? {
                entries.push(entry);
            }
            Ok(Some(entries))
        }
    }

    deserializer.deserialize_any(EntriesVisitor)
}

#[derive(Debug, Default, Deserialize)]
struct MetaDocument {
    #[serde(default)]
    output: Option<OutputDocument>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputDocument {
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ColumnDocument {
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    dtype: Option<String>,
    #[serde(default)]
    transforms: Option<Vec<OpDocument>>,
}

#[derive(Debug, Default, Deserialize)]
struct OpDocument {
    #[serde(default)]
    op: Option<String>,
    #[serde(default)]
    skip_na: Option<bool>,
    #[serde(default)]
    to: Option<String>,
}

impl From<OpDocument> for OpSpec {
    fn from(doc: OpDocument) -> Self {
        let name = doc.op.unwrap_or_default();
        OpSpec::new(Operator::resolve(&name, doc.to.as_deref()))
            .with_skip_na(doc.skip_na.unwrap_or(false))
    }
}

impl Schema {
    /// Parse a schema from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NoColumns`] when the document declares no
    /// columns, and a parse error when the document has the wrong shape.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let document: Option<SchemaDocument> = serde_yaml::from_str(text)?;
        resolve(document)
    }

    /// Parse a schema from a YAML reader.
    ///
    /// # Errors
    ///
    /// Same as [`Schema::from_yaml_str`].
    pub fn from_yaml_reader<R: Read>(reader: R) -> Result<Self> {
        let document: Option<SchemaDocument> = serde_yaml::from_reader(reader)?;
        resolve(document)
    }
}

fn resolve(document: Option<SchemaDocument>) -> Result<Schema> {
    let Some(document) = document else {
        return Err(SchemaError::NoColumns);
    };
    let columns = document.columns.unwrap_or_default();
    if columns.is_empty() {
        return Err(SchemaError::NoColumns);
    }

    let encoding = document
        .meta
        .and_then(|meta| meta.output)
        .and_then(|output| output.encoding)
        .unwrap_or_else(|| DEFAULT_OUTPUT_ENCODING.to_string());

    let mut schema = Schema::default().with_output_encoding(encoding);
    for (key, value) in columns {
        let source = column_key(&key)?;
        let spec = column_spec(&source, value)?;
        schema.insert(source, spec);
    }
    Ok(schema)
}

fn column_key(key: &Value) -> Result<String> {
    match key {
        Value::String(name) => Ok(name.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(SchemaError::InvalidKey(format!("{other:?}"))),
    }
}

fn column_spec(source: &str, value: Value) -> Result<ColumnSpec> {
    let document: ColumnDocument = if value.is_null() {
        ColumnDocument::default()
    } else {
        serde_yaml::from_value(value).map_err(|source_error| SchemaError::InvalidColumn {
            column: source.to_string(),
            source: source_error,
        })?
    };
    Ok(ColumnSpec {
        target: document.target.unwrap_or_else(|| source.to_string()),
        dtype: document
            .dtype
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map(DType::resolve),
        transforms: document
            .transforms
            .unwrap_or_default()
            .into_iter()
            .map(OpSpec::from)
            .collect(),
    })
}
