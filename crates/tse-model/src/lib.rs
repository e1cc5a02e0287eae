//! Cleaning-schema model.
//!
//! A schema document is parsed once into the typed [`Schema`] model. Operator
//! and dtype names are resolved at that point, so later stages only match on
//! closed enums.

pub mod document;
pub mod error;
pub mod operator;
pub mod schema;

pub use error::{Result, SchemaError};
pub use operator::{CastTarget, DType, NoOpReason, Operator};
pub use schema::{ColumnSpec, DEFAULT_OUTPUT_ENCODING, OpSpec, Schema};
