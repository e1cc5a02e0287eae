//! Batch orchestration for TSE candidate tables.

pub mod batch;
pub mod jobs;
pub mod sources;

pub use batch::{
    BatchItem, BatchReport, BatchStage, ItemFailure, ItemOutcome, TableSink, run_batch,
};
pub use jobs::{
    AMAZON_STATES, ArchiveYearItem, CleanSink, CleanYearItem, DEFAULT_OUTPUT_NAME,
    DEFAULT_STATE_COLUMN, DEFAULT_TARGET, RawSink, StateFilter, clean_items, write_combined,
};
pub use sources::Sources;
