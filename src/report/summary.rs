//! Batch counters.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{CoordinateKind, CorrectionStrategy, ProcessedRecord};

/// Aggregate view of a processed batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub total: usize,
    pub success: usize,
    pub corrected: usize,
    pub failed: usize,
    /// Counts per classifier proposal (before correction).
    pub by_classified_kind: BTreeMap<CoordinateKind, usize>,
    /// Counts per resolved kind of successful records.
    pub by_resolved_kind: BTreeMap<CoordinateKind, usize>,
    pub by_strategy: BTreeMap<CorrectionStrategy, usize>,
}

impl BatchSummary {
    /// Share of processed records that ended in a valid coordinate.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.success as f64 / self.total as f64
    }
}

/// Count outcomes. `rows_read`/`rows_skipped` come from ingest.
pub fn summarize(records: &[ProcessedRecord], rows_read: usize, rows_skipped: usize) -> BatchSummary {
    let mut summary = BatchSummary {
        rows_read,
        rows_skipped,
        total: records.len(),
        ..BatchSummary::default()
    };

    for r in records {
        let result = &r.result;
        *summary.by_classified_kind.entry(result.classified_as).or_insert(0) += 1;

        if result.success {
            summary.success += 1;
            *summary.by_resolved_kind.entry(result.kind).or_insert(0) += 1;
            if result.was_corrected {
                summary.corrected += 1;
            }
            if let Some(strategy) = result.strategy {
                *summary.by_strategy.entry(strategy).or_insert(0) += 1;
            }
        } else {
            summary.failed += 1;
        }
    }

    summary
}
