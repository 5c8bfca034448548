/// Station resolution: join the configured station table against the
/// dashboard payload to produce the per-row readings the layout engine and
/// renderer consume.
///
/// Resolution is isolated per station: a record missing from the payload
/// degrades that one row to documented defaults and never fails the run.

use crate::ingest::ffd::{DashboardResponse, StationRecord};
use crate::logging::{self, DataSource};
use crate::model::{Severity, StationReading, Trend};
use crate::stations::StationTable;

// ---------------------------------------------------------------------------
// Flow formatting
// ---------------------------------------------------------------------------

/// Parse a discharge value as an integer, tolerating thousands separators
/// and surrounding whitespace.
fn parse_flow(raw: &str) -> Option<i64> {
    raw.replace(',', "").trim().parse().ok()
}

/// Render a discharge with locale-style thousands separators and the unit
/// suffix. A value that does not parse as an integer passes through
/// unchanged (plus the suffix); the feed occasionally sends placeholders
/// like "N/A" and the report must still render.
pub fn format_flow(raw: &str) -> String {
    match parse_flow(raw) {
        Some(n) => format!("{} cusecs", thousands(n)),
        None => format!("{} cusecs", raw),
    }
}

fn thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    let lead = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// First payload record matching the configured name, if any. Exact,
/// case-sensitive match; duplicates are not expected but the first wins.
fn find_record<'a>(payload: &'a DashboardResponse, api_name: &str) -> Option<&'a StationRecord> {
    payload.data.iter().find(|r| r.name == api_name)
}

/// Build the ordered readings for every configured station.
///
/// The output always has exactly one entry per table row, in table order.
/// The report never omits a configured station, even when the upstream
/// source drops it.
pub fn resolve_readings(table: &StationTable, payload: &DashboardResponse) -> Vec<StationReading> {
    table
        .stations
        .iter()
        .map(|entry| match find_record(payload, &entry.api_name) {
            Some(record) => {
                let status = record.status.as_deref().unwrap_or("NORMAL");
                let flow_raw = record
                    .outflow_discharge
                    .as_deref()
                    .or(record.inflow_discharge.as_deref())
                    .unwrap_or("0");
                if parse_flow(flow_raw).is_none() {
                    logging::warn(
                        DataSource::Ffd,
                        Some(&entry.api_name),
                        &format!("non-numeric discharge '{}', rendering as-is", flow_raw),
                    );
                }
                let trend_label = record
                    .outflow_trend
                    .as_deref()
                    .or(record.inflow_trend.as_deref())
                    .unwrap_or("Steady");
                StationReading {
                    title: entry.title(),
                    severity: Severity::parse(status),
                    flow: format_flow(flow_raw),
                    trend: Trend::parse(trend_label),
                    trend_label: trend_label.to_string(),
                    short_name: entry.short_name.clone(),
                }
            }
            None => {
                logging::warn(
                    DataSource::Ffd,
                    Some(&entry.api_name),
                    "station not present in dashboard payload, rendering defaults",
                );
                StationReading {
                    title: entry.title(),
                    severity: Severity::Normal,
                    flow: "0 cusecs".to_string(),
                    trend: Trend::Steady,
                    trend_label: "Steady".to_string(),
                    short_name: entry.short_name.clone(),
                }
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> DashboardResponse {
        serde_json::from_str(json).expect("test payload should parse")
    }

    #[test]
    fn test_format_flow_inserts_thousands_separators() {
        assert_eq!(format_flow("52100"), "52,100 cusecs");
        assert_eq!(format_flow("143,700"), "143,700 cusecs");
        assert_eq!(format_flow("1000000"), "1,000,000 cusecs");
        assert_eq!(format_flow("0"), "0 cusecs");
        assert_eq!(format_flow("999"), "999 cusecs");
        assert_eq!(format_flow(" 1234 "), "1,234 cusecs");
    }

    #[test]
    fn test_format_flow_passes_non_integers_through() {
        assert_eq!(format_flow("N/A"), "N/A cusecs");
        assert_eq!(format_flow("12.5"), "12.5 cusecs");
        assert_eq!(format_flow(""), " cusecs");
    }

    #[test]
    fn test_format_flow_negative() {
        // Never expected from the feed, but the formatter should not panic
        // or garble the sign.
        assert_eq!(format_flow("-5200"), "-5,200 cusecs");
    }

    #[test]
    fn test_resolution_joins_by_exact_name() {
        let table = StationTable::builtin();
        let p = payload(
            r#"{"latest_reading_time": "t", "data": [
                {"name": "Marala", "status": "HIGH",
                 "outflow_discharge": "143,700", "outflow_trend": "Rising"},
                {"name": "marala", "status": "EX_HIGH"}
            ]}"#,
        );
        let readings = resolve_readings(&table, &p);
        assert_eq!(readings.len(), 9);
        let marala = &readings[3];
        assert_eq!(marala.title, "Marala at Chenab");
        assert_eq!(marala.severity, Severity::High);
        assert_eq!(marala.flow, "143,700 cusecs");
        assert_eq!(marala.trend, Trend::Rising);
        assert_eq!(marala.trend_label, "Rising");
    }

    #[test]
    fn test_missing_station_renders_defaults() {
        let table = StationTable::builtin();
        let p = payload(r#"{"latest_reading_time": "t", "data": []}"#);
        let readings = resolve_readings(&table, &p);
        assert_eq!(readings.len(), 9, "no configured station may be omitted");
        for r in &readings {
            assert_eq!(r.severity, Severity::Normal);
            assert_eq!(r.flow, "0 cusecs");
            assert_eq!(r.trend, Trend::Steady);
            assert_eq!(r.trend_label, "Steady");
        }
    }

    #[test]
    fn test_outflow_preferred_over_inflow() {
        let table = StationTable::builtin();
        let p = payload(
            r#"{"data": [
                {"name": "Guddu",
                 "outflow_discharge": "100", "inflow_discharge": "200",
                 "outflow_trend": "Falling", "inflow_trend": "Rising"}
            ]}"#,
        );
        let guddu = &resolve_readings(&table, &p)[6];
        assert_eq!(guddu.flow, "100 cusecs");
        assert_eq!(guddu.trend, Trend::Falling);
    }

    #[test]
    fn test_inflow_fallback_when_outflow_absent() {
        let table = StationTable::builtin();
        let p = payload(
            r#"{"data": [
                {"name": "Guddu", "inflow_discharge": "200", "inflow_trend": "Rising"}
            ]}"#,
        );
        let guddu = &resolve_readings(&table, &p)[6];
        assert_eq!(guddu.flow, "200 cusecs");
        assert_eq!(guddu.trend, Trend::Rising);
    }

    #[test]
    fn test_absent_status_defaults_to_normal() {
        let table = StationTable::builtin();
        let p = payload(r#"{"data": [{"name": "Guddu", "outflow_discharge": "1"}]}"#);
        let guddu = &resolve_readings(&table, &p)[6];
        assert_eq!(guddu.severity, Severity::Normal);
        assert_eq!(guddu.trend_label, "Steady");
    }

    #[test]
    fn test_unmapped_trend_keeps_label_but_colors_as_steady() {
        let table = StationTable::builtin();
        let p = payload(
            r#"{"data": [{"name": "Guddu", "outflow_discharge": "1", "outflow_trend": "Surging"}]}"#,
        );
        let guddu = &resolve_readings(&table, &p)[6];
        assert_eq!(guddu.trend_label, "Surging");
        assert_eq!(guddu.trend, Trend::Steady);
    }
}
