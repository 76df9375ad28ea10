//! CSV ingest.
//!
//! Turns a spreadsheet export with arbitrary extra columns into a list of raw
//! `(x, y)` cells keyed by record id. Cell text is kept as-is: cleaning and
//! interpretation belong to the engine.
//!
//! Schema problems (unreadable file, missing coordinate columns) are fatal.
//! Row problems (malformed CSV lines, short rows) are collected and reported.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;

use csv::StringRecord;
use serde::Serialize;

use crate::domain::{BatchConfig, RawValue};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

/// One input row, reduced to what the engine needs.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRecord {
    pub line: usize,
    pub id: String,
    pub x: RawValue,
    pub y: RawValue,
}

impl InputRecord {
    pub fn raw_pair(&self) -> (RawValue, RawValue) {
        (self.x.clone(), self.y.clone())
    }
}

/// Ingest output: usable records + row errors + counters.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub records: Vec<InputRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Column names to read, already normalized for header lookup.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub id: Option<String>,
    pub x: String,
    pub y: String,
}

impl ColumnSpec {
    pub fn from_config(config: &BatchConfig) -> Self {
        Self {
            id: config.id_col.as_deref().map(normalize_header_name),
            x: normalize_header_name(&config.x_col),
            y: normalize_header_name(&config.y_col),
        }
    }
}

/// Load the configured CSV file.
pub fn load_records(config: &BatchConfig) -> Result<IngestedData, AppError> {
    let file = File::open(&config.input)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", config.input.display())))?;
    read_records(file, &ColumnSpec::from_config(config))
}

/// Read records from any CSV source.
pub fn read_records<R: Read>(source: R, columns: &ColumnSpec) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_columns_exist(columns, &header_map)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map, columns, line) {
            Ok(r) => records.push(r),
            Err((id, message)) => row_errors.push(RowError { line, id, message }),
        }
    }

    if rows_read == 0 {
        return Err(AppError::empty("CSV has a header but no data rows."));
    }
    if records.is_empty() {
        return Err(AppError::empty(format!(
            "No usable rows: all {rows_read} row(s) were rejected during ingest."
        )));
    }

    let rows_used = records.len();
    Ok(IngestedData {
        records,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    columns: &ColumnSpec,
    line: usize,
) -> Result<InputRecord, (Option<String>, String)> {
    let id = match &columns.id {
        Some(col) => get_optional(record, header_map, col).map(str::to_string),
        None => None,
    };

    let x_idx = header_map[&columns.x];
    let y_idx = header_map[&columns.y];
    if record.len() <= x_idx.max(y_idx) {
        return Err((
            id,
            format!(
                "Row has {} field(s) but the coordinate columns need {}.",
                record.len(),
                x_idx.max(y_idx) + 1
            ),
        ));
    }

    Ok(InputRecord {
        line,
        id: id.unwrap_or_else(|| line.to_string()),
        x: cell_value(get_optional(record, header_map, &columns.x)),
        y: cell_value(get_optional(record, header_map, &columns.y)),
    })
}

fn cell_value(cell: Option<&str>) -> RawValue {
    match cell {
        Some(text) => RawValue::Text(text.to_string()),
        None => RawValue::Missing,
    }
}

fn ensure_columns_exist(columns: &ColumnSpec, header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let mut missing = Vec::new();
    for name in [Some(&columns.x), Some(&columns.y), columns.id.as_ref()].into_iter().flatten() {
        if !header_map.contains_key(name) {
            missing.push(format!("`{name}`"));
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::input(format!("Missing required column(s): {}", missing.join(", "))))
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(id: Option<&str>) -> ColumnSpec {
        ColumnSpec {
            id: id.map(str::to_string),
            x: "x".to_string(),
            y: "y".to_string(),
        }
    }

    fn read(csv: &str, id: Option<&str>) -> Result<IngestedData, AppError> {
        read_records(csv.as_bytes(), &columns(id))
    }

    #[test]
    fn reads_text_cells_and_ids() {
        let data = read("folio,X,Y,notes\nA-1,\"781,265\",2414688,ok\nA-2,-102.29,21.88,\n", Some("folio")).unwrap();
        assert_eq!(data.rows_read, 2);
        assert_eq!(data.rows_used, 2);
        assert!(data.row_errors.is_empty());
        assert_eq!(data.records[0].id, "A-1");
        assert_eq!(data.records[0].x, RawValue::Text("781,265".to_string()));
        assert_eq!(data.records[1].y, RawValue::Text("21.88".to_string()));
    }

    #[test]
    fn bom_and_case_in_headers_are_ignored() {
        let data = read("\u{feff}X, Y \n1,2\n", None).unwrap();
        assert_eq!(data.records.len(), 1);
    }

    #[test]
    fn id_defaults_to_line_number() {
        let data = read("x,y\n1,2\n3,4\n", None).unwrap();
        assert_eq!(data.records[0].id, "2");
        assert_eq!(data.records[1].id, "3");
        assert_eq!(data.records[1].line, 3);
    }

    #[test]
    fn empty_cells_become_missing() {
        let data = read("x,y\n,2\n", None).unwrap();
        assert_eq!(data.records[0].x, RawValue::Missing);
    }

    #[test]
    fn short_rows_are_reported_not_fatal() {
        let data = read("id,x,y\nA,1,2\nB,3\n", Some("id")).unwrap();
        assert_eq!(data.rows_read, 2);
        assert_eq!(data.rows_used, 1);
        assert_eq!(data.row_errors.len(), 1);
        assert_eq!(data.row_errors[0].line, 3);
        assert_eq!(data.row_errors[0].id.as_deref(), Some("B"));
    }

    #[test]
    fn missing_columns_are_input_errors() {
        let err = read("a,b\n1,2\n", None).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.message().contains("`x`"));

        let err = read("x,y\n1,2\n", Some("folio")).unwrap_err();
        assert!(err.message().contains("`folio`"));
    }

    #[test]
    fn no_rows_is_an_empty_error() {
        let err = read("x,y\n", None).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_EMPTY);
    }
}
