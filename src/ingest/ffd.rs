/// FFD Dashboard API Client
///
/// Retrieves the flood forecasting authority's dashboard payload: one
/// reporting timestamp plus the current reading for every gauge the
/// authority publishes. The endpoint takes a POST with a form-encoded
/// static API key and answers with JSON.
///
/// This is the run's single network call. Any transport failure or
/// non-success status is fatal to the run; there is no retry.

use serde::{Deserialize, Deserializer};
use std::time::Duration;

use crate::model::ReportError;

/// Request timeout for the one dashboard call. The process aborts if the
/// endpoint does not answer within this window.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Dashboard API Response Structures
// ============================================================================

/// Top-level dashboard response.
#[derive(Debug, Deserialize)]
pub struct DashboardResponse {
    /// Reporting timestamp, e.g. "09-Sep-2025 13:00 PKT". Drives both the
    /// changed-since-last-run gate and the output filename.
    #[serde(default)]
    pub latest_reading_time: String,
    /// Per-station records. Stations we monitor are looked up by name;
    /// extra records are ignored.
    #[serde(default)]
    pub data: Vec<StationRecord>,
}

/// One gauge record from the dashboard.
///
/// Discharge fields have been observed both as strings ("143,700") and as
/// bare numbers depending on feed revision, so they deserialize through
/// `stringish`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationRecord {
    pub name: String,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "stringish")]
    pub outflow_discharge: Option<String>,
    #[serde(default, deserialize_with = "stringish")]
    pub inflow_discharge: Option<String>,
    pub outflow_trend: Option<String>,
    pub inflow_trend: Option<String>,
}

/// Accept a JSON string or number as `Option<String>`.
fn stringish<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }))
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Build the blocking HTTP client used for the dashboard call.
pub fn build_client() -> Result<reqwest::blocking::Client, Box<dyn std::error::Error>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    Ok(client)
}

/// Fetch the dashboard payload.
///
/// # Parameters
/// - `client`: HTTP client
/// - `url`: dashboard endpoint (FFD_API_URL)
/// - `api_key`: static credential, sent as the form field `API_KEY`
pub fn fetch_dashboard(
    client: &reqwest::blocking::Client,
    url: &str,
    api_key: &str,
) -> Result<DashboardResponse, Box<dyn std::error::Error>> {
    let response = client
        .post(url)
        .form(&[("API_KEY", api_key)])
        .header("Accept", "application/json")
        .send()?;

    if !response.status().is_success() {
        return Err(Box::new(ReportError::HttpStatus(
            response.status().as_u16(),
        )));
    }

    let payload: DashboardResponse = response
        .json()
        .map_err(|e| ReportError::Decode(e.to_string()))?;

    Ok(payload)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_payload() {
        let json = r#"{
            "latest_reading_time": "09-Sep-2025 13:00 PKT",
            "data": [
                {
                    "name": "Marala",
                    "status": "HIGH",
                    "outflow_discharge": "143,700",
                    "inflow_discharge": "151,200",
                    "outflow_trend": "Rising",
                    "inflow_trend": "Rising"
                }
            ]
        }"#;
        let payload: DashboardResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.latest_reading_time, "09-Sep-2025 13:00 PKT");
        assert_eq!(payload.data.len(), 1);
        let rec = &payload.data[0];
        assert_eq!(rec.name, "Marala");
        assert_eq!(rec.status.as_deref(), Some("HIGH"));
        assert_eq!(rec.outflow_discharge.as_deref(), Some("143,700"));
        assert_eq!(rec.outflow_trend.as_deref(), Some("Rising"));
    }

    #[test]
    fn test_parse_numeric_discharge() {
        // Some feed revisions send discharges as bare numbers.
        let json = r#"{
            "latest_reading_time": "x",
            "data": [{"name": "Guddu", "outflow_discharge": 52100}]
        }"#;
        let payload: DashboardResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.data[0].outflow_discharge.as_deref(), Some("52100"));
        assert_eq!(payload.data[0].status, None);
        assert_eq!(payload.data[0].inflow_discharge, None);
    }

    #[test]
    fn test_parse_tolerates_missing_top_level_fields() {
        let payload: DashboardResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.latest_reading_time, "");
        assert!(payload.data.is_empty());
    }

    #[test]
    fn test_parse_null_discharge_is_none() {
        let json = r#"{"data": [{"name": "Guddu", "outflow_discharge": null}]}"#;
        let payload: DashboardResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.data[0].outflow_discharge, None);
    }
}
