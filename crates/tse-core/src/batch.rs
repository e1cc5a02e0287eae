//! Partial-failure batch loop.
//!
//! Each item runs fetch, transform and store exactly once. The first failing
//! stage is recorded against the item and the loop moves on to the next one.

use std::fmt;

use anyhow::Result;
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{error, info, info_span};

/// One independent unit of work, identified by `id`.
pub trait BatchItem {
    /// What `fetch` hands to `transform`.
    type Fetched;

    fn id(&self) -> &str;

    fn fetch(&self) -> Result<Self::Fetched>;

    fn transform(&self, fetched: Self::Fetched) -> Result<DataFrame>;
}

/// Destination of transformed tables.
pub trait TableSink {
    fn store(&mut self, id: &str, table: DataFrame) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStage {
    Fetch,
    Transform,
    Store,
}

impl BatchStage {
    pub fn as_str(self) -> &'static str {
        match self {
            BatchStage::Fetch => "fetch",
            BatchStage::Transform => "transform",
            BatchStage::Store => "store",
        }
    }
}

impl fmt::Display for BatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The stage an item stopped at and why.
#[derive(Debug)]
pub struct ItemFailure {
    pub stage: BatchStage,
    pub error: anyhow::Error,
}

impl ItemFailure {
    pub fn new(stage: BatchStage, error: anyhow::Error) -> Self {
        Self { stage, error }
    }

    /// Error message including its context chain.
    pub fn message(&self) -> String {
        format!("{:#}", self.error)
    }
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {:#}", self.stage, self.error)
    }
}

/// Passed to the observer after each item.
#[derive(Debug, Clone, Copy)]
pub enum ItemOutcome<'a> {
    Stored { rows: usize },
    Failed(&'a ItemFailure),
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, ItemFailure)>,
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    total: usize,
    succeeded: &'a [String],
    failed: Vec<FailureDocument<'a>>,
}

#[derive(Serialize)]
struct FailureDocument<'a> {
    id: &'a str,
    stage: BatchStage,
    error: String,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// `1` when any item failed, else `0`.
    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_failures())
    }

    /// Pretty JSON document of the outcome.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let document = ReportDocument {
            total: self.total(),
            succeeded: &self.succeeded,
            failed: self
                .failed
                .iter()
                .map(|(id, failure)| FailureDocument {
                    id,
                    stage: failure.stage,
                    error: failure.message(),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&document)
    }
}

fn process_item<I, S>(item: &I, sink: &mut S) -> Result<usize, ItemFailure>
where
    I: BatchItem,
    S: TableSink + ?Sized,
{
    let fetched = item
        .fetch()
        .map_err(|error| ItemFailure::new(BatchStage::Fetch, error))?;
    let table = item
        .transform(fetched)
        .map_err(|error| ItemFailure::new(BatchStage::Transform, error))?;
    let rows = table.height();
    sink.store(item.id(), table)
        .map_err(|error| ItemFailure::new(BatchStage::Store, error))?;
    Ok(rows)
}

/// Run every item in order and collect the outcome.
///
/// A failing item never stops the batch. `observer` is called once per item
/// after it finishes.
pub fn run_batch<It, S, F>(items: It, sink: &mut S, mut observer: F) -> BatchReport
where
    It: IntoIterator,
    It::Item: BatchItem,
    S: TableSink + ?Sized,
    F: FnMut(&str, ItemOutcome<'_>),
{
    let report = items
        .into_iter()
        .fold(BatchReport::default(), |mut report, item| {
            let span = info_span!("item", id = %item.id());
            let _guard = span.enter();
            match process_item(&item, &mut *sink) {
                Ok(rows) => {
                    info!(rows, "item stored");
                    observer(item.id(), ItemOutcome::Stored { rows });
                    report.succeeded.push(item.id().to_string());
                }
                Err(failure) => {
                    error!(stage = %failure.stage, error = %failure.message(), "item failed");
                    observer(item.id(), ItemOutcome::Failed(&failure));
                    report.failed.push((item.id().to_string(), failure));
                }
            }
            report
        });
    info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "batch complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_follows_failures() {
        let mut report = BatchReport::default();
        report.succeeded.push("2018".to_string());
        assert_eq!(report.exit_code(), 0);
        report.failed.push((
            "2022".to_string(),
            ItemFailure::new(BatchStage::Store, anyhow::anyhow!("disk full")),
        ));
        assert!(report.has_failures());
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.total(), 2);
    }

    #[test]
    fn failure_message_keeps_context() {
        let error = anyhow::anyhow!("no such file").context("read archive 2022");
        let failure = ItemFailure::new(BatchStage::Fetch, error);
        assert_eq!(failure.message(), "read archive 2022: no such file");
        assert_eq!(
            failure.to_string(),
            "fetch failed: read archive 2022: no such file"
        );
    }
}
