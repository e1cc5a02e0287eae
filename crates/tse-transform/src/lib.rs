//! Schema-driven cleaning of candidate tables.
//!
//! This crate provides the cleaning engine:
//!
//! - **operators**: operator dispatch over text columns
//! - **coerce**: best-effort dtype enforcement
//! - **clean**: column resolution, per-column pipeline and reassembly
//! - **filter** / **stack**: row filtering and combining per-year tables
//! - **loader**: schema loading with warnings for unresolved names

pub mod clean;
pub mod coerce;
pub mod error;
pub mod filter;
pub mod loader;
pub mod operators;
pub mod stack;

pub use clean::clean_with_schema;
pub use coerce::{CoercionOutcome, coerce, to_text, try_coerce};
pub use error::{Result, TransformError};
pub use filter::filter_rows_in;
pub use loader::{load_schema, report_unresolved};
pub use operators::{apply_operator, apply_transforms};
pub use stack::stack_frames;
