use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span, warn};

use tse_core::{
    BatchReport, CleanSink, ItemOutcome, RawSink, Sources, StateFilter, clean_items, run_batch,
    write_combined,
};
use tse_ingest::{LocalStore, normalize_bucket_name};
use tse_model::Schema;
use tse_transform::load_schema;

use crate::cli::{CleanArgs, CollectArgs, SchemaArgs};
use crate::types::BatchOutcome;

/// Store rooted at `location`, accepting `gs://` bucket names.
pub fn store_for(location: &str) -> LocalStore {
    LocalStore::new(normalize_bucket_name(location))
}

pub fn run_collect(args: &CollectArgs) -> Result<BatchOutcome> {
    let span = info_span!("collect", sources = %args.sources.display());
    let _guard = span.enter();

    let sources = Sources::load(&args.sources)?;
    let base = args.sources.parent().unwrap_or_else(|| Path::new(""));
    let items = sources.items(&args.years, base, &args.target);
    if items.is_empty() {
        bail!(
            "no archive sources selected from {}",
            args.sources.display()
        );
    }
    info!(years = items.len(), target = %args.target, "collecting archives");

    let mut sink = RawSink::new(store_for(&args.raw_dir));
    let progress = batch_progress(items.len(), "collect");
    let mut rows = BTreeMap::new();
    let report = run_batch(items, &mut sink, |id, outcome| {
        record_outcome(&mut rows, &progress, id, outcome);
    });
    progress.finish_and_clear();

    write_report(args.report.as_deref(), &report)?;
    Ok(BatchOutcome {
        command: "collect",
        report,
        rows,
        output: None,
        fatal: None,
    })
}

pub fn run_clean(args: &CleanArgs) -> Result<BatchOutcome> {
    let span = info_span!("clean", schema = %args.schema.display());
    let _guard = span.enter();

    let schema = load_schema(&args.schema)
        .with_context(|| format!("load schema {}", args.schema.display()))?;
    let filter = state_filter(args);

    let raw = store_for(&args.raw_dir);
    let processed = store_for(&args.processed_dir);
    let items = clean_items(&raw, &schema, filter.as_ref())?;
    info!(
        years = items.len(),
        raw = %raw.root().display(),
        "cleaning raw store"
    );

    let mut sink =
        CleanSink::new(processed.clone(), schema.output_encoding()).with_per_year(args.per_year);
    let progress = batch_progress(items.len(), "clean");
    let mut rows = BTreeMap::new();
    let report = run_batch(items, &mut sink, |id, outcome| {
        record_outcome(&mut rows, &progress, id, outcome);
    });
    progress.finish_and_clear();
    write_report(args.report.as_deref(), &report)?;

    let mut outcome = BatchOutcome {
        command: "clean",
        report,
        rows,
        output: None,
        fatal: None,
    };
    match write_combined(
        sink.into_frames(),
        &processed,
        &args.output_name,
        schema.output_encoding(),
    ) {
        Ok(total) => {
            outcome.output = Some((processed.root().join(&args.output_name), total));
        }
        Err(error) => {
            warn!(error = %format!("{error:#}"), "combined output not written");
            outcome.fatal = Some(format!("{error:#}"));
        }
    }
    Ok(outcome)
}

pub fn run_schema(args: &SchemaArgs) -> Result<Schema> {
    load_schema(&args.schema).with_context(|| format!("load schema {}", args.schema.display()))
}

fn state_filter(args: &CleanArgs) -> Option<StateFilter> {
    if args.no_state_filter {
        return None;
    }
    let mut filter = StateFilter::amazon();
    filter.column.clone_from(&args.state_column);
    if !args.states.is_empty() {
        filter.allowed = args
            .states
            .iter()
            .map(|state| state.trim().to_uppercase())
            .collect();
    }
    Some(filter)
}

fn record_outcome(
    rows: &mut BTreeMap<String, usize>,
    progress: &ProgressBar,
    id: &str,
    outcome: ItemOutcome<'_>,
) {
    match outcome {
        ItemOutcome::Stored { rows: count } => {
            rows.insert(id.to_string(), count);
            progress.set_message(format!("{id} ok"));
        }
        ItemOutcome::Failed(failure) => {
            progress.set_message(format!("{id} failed at {}", failure.stage));
        }
    }
    progress.inc(1);
}

fn batch_progress(len: usize, label: &str) -> ProgressBar {
    let progress = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template(
        "  {prefix:<8} {bar:40.cyan/blue} {pos}/{len} years [{elapsed_precise}] {msg}",
    )
    .map(|style| style.progress_chars("##-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style);
    progress.set_prefix(label.to_string());
    progress
}

fn write_report(path: Option<&Path>, report: &BatchReport) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let json = report.to_json().context("serialize batch report")?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "batch report written");
    Ok(())
}
