//! Human-readable output for single conversions and batch runs.

use crate::domain::{GeoPoint, ProcessResult, RawValue, Xy};
use crate::report::summary::BatchSummary;

/// Shown wherever a location cannot be produced.
pub const UNAVAILABLE: &str = "coordinates unavailable";

/// `"lat, lng"` with six decimals.
pub fn format_geo(point: &GeoPoint) -> String {
    format!("{:.6}, {:.6}", point.lat, point.lng)
}

/// Display string for a result: the position, or [`UNAVAILABLE`].
pub fn display_location(result: &ProcessResult) -> String {
    match (&result.geographic, result.success) {
        (Some(point), true) => format_geo(point),
        _ => UNAVAILABLE.to_string(),
    }
}

/// Multi-line report for one conversion.
pub fn format_result(result: &ProcessResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("Input     : x={} y={}\n", show_raw(&result.original.0), show_raw(&result.original.1)));
    out.push_str(&format!("Normalized: {}\n", fmt_opt_pair(result.normalized.x, result.normalized.y)));
    out.push_str(&format!("Classified: {}\n", result.classified_as.display_name()));

    if result.success {
        out.push_str(&format!("Kind      : {}\n", result.kind.display_name()));
    }
    if let Some(c) = result.corrected {
        let label = if result.was_corrected { "Corrected " } else { "Pair      " };
        out.push_str(&format!("{label}: {}\n", fmt_xy(c)));
    }
    if let Some(strategy) = result.strategy {
        out.push_str(&format!("Strategy  : {}\n", strategy.display_name()));
    }
    out.push_str(&format!("Location  : {}\n", display_location(result)));
    if let Some(err) = &result.error {
        out.push_str(&format!("Error     : {err}\n"));
    }

    out
}

/// Batch summary block printed after `batch`.
pub fn format_summary(summary: &BatchSummary) -> String {
    let mut out = String::new();

    out.push_str("=== cfx - batch summary ===\n");
    out.push_str(&format!(
        "Rows: read={} | processed={} | skipped={}\n",
        summary.rows_read, summary.total, summary.rows_skipped
    ));
    out.push_str(&format!(
        "Outcome: success={} ({:.1}%) | corrected={} | failed={}\n",
        summary.success,
        100.0 * summary.success_rate(),
        summary.corrected,
        summary.failed
    ));

    if !summary.by_classified_kind.is_empty() {
        out.push_str("\nClassified as:\n");
        for (kind, n) in &summary.by_classified_kind {
            out.push_str(&format!("  {:<24} {n:>8}\n", kind.display_name()));
        }
    }
    if !summary.by_resolved_kind.is_empty() {
        out.push_str("\nResolved to:\n");
        for (kind, n) in &summary.by_resolved_kind {
            out.push_str(&format!("  {:<24} {n:>8}\n", kind.display_name()));
        }
    }
    if !summary.by_strategy.is_empty() {
        out.push_str("\nStrategies used:\n");
        for (strategy, n) in &summary.by_strategy {
            out.push_str(&format!("  {:<24} {n:>8}\n", strategy.display_name()));
        }
    }

    out
}

fn show_raw(v: &RawValue) -> String {
    match v {
        RawValue::Number(n) => n.to_string(),
        RawValue::Text(s) => format!("{s:?}"),
        RawValue::Missing => "<missing>".to_string(),
    }
}

fn fmt_xy(p: Xy) -> String {
    format!("({}, {})", trim_float(p.x), trim_float(p.y))
}

fn fmt_opt_pair(x: Option<f64>, y: Option<f64>) -> String {
    let part = |v: Option<f64>| v.map(trim_float).unwrap_or_else(|| "-".to_string());
    format!("({}, {})", part(x), part(y))
}

/// Up to six decimals without trailing zeros.
fn trim_float(v: f64) -> String {
    let s = format!("{v:.6}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;

    #[test]
    fn geo_display_has_six_decimals() {
        let p = GeoPoint {
            lat: 21.813_690_52,
            lng: -102.279_399_95,
        };
        assert_eq!(format_geo(&p), "21.813691, -102.279400");
    }

    #[test]
    fn failures_show_placeholder() {
        let r = Engine::new().process("abc", RawValue::Missing);
        assert_eq!(display_location(&r), UNAVAILABLE);
        let text = format_result(&r);
        assert!(text.contains("could not normalize coordinates"));
        assert!(text.contains("<missing>"));
    }

    #[test]
    fn corrected_result_lists_strategy() {
        let r = Engine::new().process(781.265, 24_146_188.0);
        let text = format_result(&r);
        assert!(text.contains("Corrected : (781265, 2414688)"), "{text}");
        assert!(text.contains("Strategy  : digit repair"));
        assert!(text.contains("Location  : 21.8136"));
    }

    #[test]
    fn float_trimming() {
        assert_eq!(trim_float(781_265.0), "781265");
        assert_eq!(trim_float(-102.29), "-102.29");
        assert_eq!(trim_float(2_400_021.88), "2400021.88");
    }

    #[test]
    fn summary_lists_sections() {
        let engine = Engine::new();
        let records: Vec<_> = [("781265", "2414688"), ("2414688", "781265"), ("x", "y")]
            .iter()
            .enumerate()
            .map(|(i, (x, y))| crate::domain::ProcessedRecord {
                id: i.to_string(),
                line: i + 2,
                result: engine.process(*x, *y),
            })
            .collect();
        let text = format_summary(&crate::report::summarize(&records, 3, 0));
        assert!(text.contains("success=2 (66.7%)"), "{text}");
        assert!(text.contains("Strategies used:"));
        assert!(text.contains("inversion swap"));
    }
}
