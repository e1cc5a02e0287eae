use std::collections::BTreeMap;
use std::path::PathBuf;

use tse_core::BatchReport;

/// Outcome of a batch command.
#[derive(Debug)]
pub struct BatchOutcome {
    pub command: &'static str,
    pub report: BatchReport,
    /// Rows stored per succeeded item.
    pub rows: BTreeMap<String, usize>,
    /// Combined output written after the batch, with its row count.
    pub output: Option<(PathBuf, usize)>,
    /// Set when the batch ran but the run as a whole could not complete.
    pub fatal: Option<String>,
}

impl BatchOutcome {
    pub fn exit_code(&self) -> i32 {
        if self.fatal.is_some() {
            1
        } else {
            self.report.exit_code()
        }
    }
}
