//! Shared batch pipeline.
//!
//! `ingest -> parallel engine map -> summarize`. Exports and printing are left
//! to the caller so the pipeline stays testable.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::domain::{BatchConfig, ProcessedRecord};
use crate::engine::Engine;
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_records};
use crate::report::{BatchSummary, summarize};

/// All computed outputs of a single `cfx batch` run.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub ingest: IngestedData,
    pub records: Vec<ProcessedRecord>,
    pub summary: BatchSummary,
}

/// Load the configured CSV and process it.
pub fn run_batch(config: &BatchConfig) -> Result<BatchOutput, AppError> {
    info!(input = %config.input.display(), "loading batch");
    let ingest = load_records(config)?;
    process_ingested(ingest, config.threads)
}

/// Process already ingested rows, optionally on a dedicated pool.
pub fn process_ingested(ingest: IngestedData, threads: Option<usize>) -> Result<BatchOutput, AppError> {
    for e in &ingest.row_errors {
        warn!(line = e.line, id = e.id.as_deref().unwrap_or(""), "skipped row: {}", e.message);
    }
    info!(
        rows_read = ingest.rows_read,
        rows_used = ingest.rows_used,
        skipped = ingest.row_errors.len(),
        "ingest complete"
    );

    let records = match threads {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| AppError::internal(format!("Failed to start worker pool: {e}")))?;
            pool.install(|| process_records(&ingest))
        }
        None => process_records(&ingest),
    };

    for r in &records {
        match (&r.result.strategy, &r.result.error) {
            (Some(strategy), _) => debug!(id = %r.id, strategy = strategy.display_name(), "corrected"),
            (None, Some(err)) => debug!(id = %r.id, "failed: {err}"),
            (None, None) => {}
        }
    }

    let summary = summarize(&records, ingest.rows_read, ingest.row_errors.len());
    info!(
        total = summary.total,
        success = summary.success,
        corrected = summary.corrected,
        failed = summary.failed,
        "batch complete"
    );

    Ok(BatchOutput {
        ingest,
        records,
        summary,
    })
}

fn process_records(ingest: &IngestedData) -> Vec<ProcessedRecord> {
    let engine = Engine::new();
    ingest
        .records
        .par_iter()
        .map(|r| {
            let (x, y) = r.raw_pair();
            ProcessedRecord {
                id: r.id.clone(),
                line: r.line,
                result: engine.process(x, y),
            }
        })
        .collect()
}
