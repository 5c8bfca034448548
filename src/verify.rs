//! Station Verification Mode
//!
//! Checks the configured station table against one live dashboard payload
//! to determine which stations are actually being reported and which
//! fields each record carries. Run with `--verify` before editing
//! `stations.toml`: a station that the feed has stopped reporting renders
//! as all-defaults, and this mode makes that visible ahead of time.

use serde::{Deserialize, Serialize};

use crate::ingest::ffd::DashboardResponse;
use crate::stations::StationTable;

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// The payload's reporting timestamp at verification time.
    pub reading_time: String,
    pub stations: Vec<StationVerification>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationVerification {
    pub api_name: String,
    /// A record with this exact name exists in the payload.
    pub present: bool,
    pub has_status: bool,
    pub has_discharge: bool,
    pub has_trend: bool,
}

// ============================================================================
// Verification
// ============================================================================

/// Compare the configured table against a payload. Pure; callers fetch.
pub fn verify_stations(table: &StationTable, payload: &DashboardResponse) -> VerificationReport {
    let stations: Vec<StationVerification> = table
        .stations
        .iter()
        .map(|entry| {
            let record = payload.data.iter().find(|r| r.name == entry.api_name);
            match record {
                Some(r) => StationVerification {
                    api_name: entry.api_name.clone(),
                    present: true,
                    has_status: r.status.is_some(),
                    has_discharge: r.outflow_discharge.is_some() || r.inflow_discharge.is_some(),
                    has_trend: r.outflow_trend.is_some() || r.inflow_trend.is_some(),
                },
                None => StationVerification {
                    api_name: entry.api_name.clone(),
                    present: false,
                    has_status: false,
                    has_discharge: false,
                    has_trend: false,
                },
            }
        })
        .collect();

    let present = stations.iter().filter(|s| s.present).count();
    let summary = VerificationSummary {
        total: stations.len(),
        present,
        absent: stations.len() - present,
    };

    VerificationReport {
        reading_time: payload.latest_reading_time.clone(),
        stations,
        summary,
    }
}

/// Human-readable dump for the `--verify` CLI path.
pub fn print_report(report: &VerificationReport) {
    println!("Dashboard reading time: {}", report.reading_time);
    println!();
    for s in &report.stations {
        if s.present {
            let mut missing = Vec::new();
            if !s.has_status {
                missing.push("status");
            }
            if !s.has_discharge {
                missing.push("discharge");
            }
            if !s.has_trend {
                missing.push("trend");
            }
            if missing.is_empty() {
                println!("  ✓ {}", s.api_name);
            } else {
                println!("  ~ {} (missing: {})", s.api_name, missing.join(", "));
            }
        } else {
            println!("  ✗ {}: not in payload", s.api_name);
        }
    }
    println!();
    println!(
        "{}/{} stations reporting, {} absent",
        report.summary.present, report.summary.total, report.summary.absent
    );
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> DashboardResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_counts_present_and_absent() {
        let table = StationTable::builtin();
        let p = payload(
            r#"{"latest_reading_time": "09-Sep-2025 13:00 PKT", "data": [
                {"name": "Marala", "status": "HIGH", "outflow_discharge": "1",
                 "outflow_trend": "Rising"},
                {"name": "Guddu"}
            ]}"#,
        );
        let report = verify_stations(&table, &p);
        assert_eq!(report.summary.total, 9);
        assert_eq!(report.summary.present, 2);
        assert_eq!(report.summary.absent, 7);
        assert_eq!(report.reading_time, "09-Sep-2025 13:00 PKT");
    }

    #[test]
    fn test_field_availability_reported_per_station() {
        let table = StationTable::builtin();
        let p = payload(
            r#"{"data": [{"name": "Guddu", "inflow_discharge": "200"}]}"#,
        );
        let report = verify_stations(&table, &p);
        let guddu = report
            .stations
            .iter()
            .find(|s| s.api_name == "Guddu")
            .unwrap();
        assert!(guddu.present);
        assert!(guddu.has_discharge, "inflow alone counts as discharge");
        assert!(!guddu.has_status);
        assert!(!guddu.has_trend);
    }

    #[test]
    fn test_extra_payload_records_are_ignored() {
        let table = StationTable::builtin();
        let p = payload(r#"{"data": [{"name": "Unknown Barrage"}]}"#);
        let report = verify_stations(&table, &p);
        assert_eq!(report.summary.present, 0);
        assert_eq!(report.stations.len(), 9);
    }
}
