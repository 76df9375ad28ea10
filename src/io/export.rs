//! Export processed batches and synthetic samples.
//!
//! CSV output is flat and spreadsheet-friendly; the JSON report carries the
//! full `ProcessResult` per record plus the batch summary.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data::SampleRecord;
use crate::domain::{ProcessedRecord, RawValue};
use crate::error::AppError;
use crate::io::ingest::RowError;
use crate::report::BatchSummary;

const RESULT_HEADER: [&str; 13] = [
    "id",
    "raw_x",
    "raw_y",
    "success",
    "classified_as",
    "kind",
    "was_corrected",
    "strategy",
    "x",
    "y",
    "lat",
    "lng",
    "error",
];

/// Everything written by `--json`.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub input: String,
    pub summary: &'a BatchSummary,
    pub row_errors: &'a [RowError],
    pub records: &'a [ProcessedRecord],
}

/// Write per-record results to a CSV file.
pub fn write_results_csv(path: &Path, records: &[ProcessedRecord]) -> Result<(), AppError> {
    let file = create(path)?;
    write_results(file, records)
}

/// Write per-record results as CSV to any writer.
pub fn write_results<W: Write>(writer: W, records: &[ProcessedRecord]) -> Result<(), AppError> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(RESULT_HEADER).map_err(write_err)?;

    for r in records {
        let res = &r.result;
        let (x, y) = res
            .corrected
            .map(|c| (c.x.to_string(), c.y.to_string()))
            .unwrap_or_default();
        let (lat, lng) = res
            .geographic
            .map(|g| (format!("{:.8}", g.lat), format!("{:.8}", g.lng)))
            .unwrap_or_default();

        let raw_x = raw_cell(&res.original.0);
        let raw_y = raw_cell(&res.original.1);
        let classified_as = enum_cell(&res.classified_as)?;
        let kind = enum_cell(&res.kind)?;
        let strategy = res.strategy.map(|s| enum_cell(&s)).transpose()?.unwrap_or_default();

        let row: [&str; 13] = [
            &r.id,
            &raw_x,
            &raw_y,
            bool_cell(res.success),
            &classified_as,
            &kind,
            bool_cell(res.was_corrected),
            &strategy,
            &x,
            &y,
            &lat,
            &lng,
            res.error.as_deref().unwrap_or(""),
        ];
        w.write_record(row).map_err(write_err)?;
    }

    w.flush()
        .map_err(|e| AppError::input(format!("Failed to flush export CSV: {e}")))
}

/// Write the JSON report to a file.
pub fn write_json_report(path: &Path, report: &JsonReport<'_>) -> Result<(), AppError> {
    let file = create(path)?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::input(format!("Failed to write JSON '{}': {e}", path.display())))
}

/// Write generated sample records as CSV.
///
/// Columns: `id,x,y,damage,expected_x,expected_y`. `expected_*` is empty for
/// records that carry no usable coordinate.
pub fn write_sample<W: Write>(writer: W, records: &[SampleRecord]) -> Result<(), AppError> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(["id", "x", "y", "damage", "expected_x", "expected_y"])
        .map_err(write_err)?;

    for r in records {
        let (ex, ey) = r
            .expected
            .map(|p| (p.x.to_string(), p.y.to_string()))
            .unwrap_or_default();
        let damage = enum_cell(&r.damage)?;
        let row: [&str; 6] = [&r.id, &r.x, &r.y, &damage, &ex, &ey];
        w.write_record(row).map_err(write_err)?;
    }

    w.flush()
        .map_err(|e| AppError::input(format!("Failed to flush sample CSV: {e}")))
}

/// Write generated sample records to a CSV file.
pub fn write_sample_csv(path: &Path, records: &[SampleRecord]) -> Result<(), AppError> {
    let file = create(path)?;
    write_sample(file, records)
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path).map_err(|e| AppError::input(format!("Failed to create '{}': {e}", path.display())))
}

fn write_err(e: csv::Error) -> AppError {
    AppError::input(format!("Failed to write CSV row: {e}"))
}

fn bool_cell(v: bool) -> &'static str {
    if v { "true" } else { "false" }
}

fn raw_cell(v: &RawValue) -> String {
    v.to_string()
}

/// The serde (snake_case) name of a unit enum variant.
fn enum_cell<T: Serialize>(v: &T) -> Result<String, AppError> {
    match serde_json::to_value(v) {
        Ok(serde_json::Value::String(s)) => Ok(s),
        Ok(other) => Ok(other.to_string()),
        Err(e) => Err(AppError::internal(format!("Failed to encode enum value: {e}"))),
    }
}
