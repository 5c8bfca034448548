/// Core data types for the river situation-report service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O and no external dependencies, only types and the
/// finite severity/trend mappings.

use std::fmt;

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Flood severity levels reported by the dashboard, in ascending order.
///
/// The upstream feed has used several spellings for the upper levels over
/// time ("V_HIGH", "VERY HIGH", "EXCEPTIONALLY_HIGH", ...). All spellings
/// collapse to one canonical variant here, at ingestion; nothing downstream
/// ever sees the raw status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Normal,
    Low,
    Medium,
    High,
    VeryHigh,
    ExHigh,
}

impl Severity {
    /// Parse an upstream status code. Unmapped input means the feed has
    /// introduced a spelling we do not know about; treat it as Normal
    /// rather than failing the whole report.
    pub fn parse(raw: &str) -> Severity {
        let canonical = raw.trim().to_uppercase().replace(' ', "_");
        match canonical.as_str() {
            "NORMAL" => Severity::Normal,
            "LOW" => Severity::Low,
            "MEDIUM" => Severity::Medium,
            "HIGH" => Severity::High,
            "VERY_HIGH" | "V_HIGH" => Severity::VeryHigh,
            "EX_HIGH" | "EXCEPTIONALLY_HIGH" => Severity::ExHigh,
            _ => Severity::Normal,
        }
    }

    /// Display label used in the status sentence.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Normal => "Normal",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::VeryHigh => "V High",
            Severity::ExHigh => "Ex High",
        }
    }

    /// Indicator/text color for this severity level.
    pub fn color_hex(&self) -> &'static str {
        match self {
            Severity::Normal => "#0F8A26",
            Severity::Low => "#00B5E2",
            Severity::Medium => "#F2B233",
            Severity::High => "#C95E0C",
            Severity::VeryHigh => "#FF2222",
            Severity::ExHigh => "#5A0A0A",
        }
    }
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

/// Discharge direction classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Falling,
    Steady,
    Rising,
}

impl Trend {
    /// Parse an upstream trend string. The match is exact; the feed has
    /// been consistent about these three labels. An unknown label falls
    /// back to Steady for *coloring* only; callers keep the original text
    /// for display (see `StationReading::trend_label`).
    pub fn parse(raw: &str) -> Trend {
        match raw {
            "Falling" => Trend::Falling,
            "Steady" => Trend::Steady,
            "Rising" => Trend::Rising,
            _ => Trend::Steady,
        }
    }

    pub fn color_hex(&self) -> &'static str {
        match self {
            Trend::Falling => "#32CD32",
            Trend::Steady => "#008000",
            Trend::Rising => "#E00000",
        }
    }
}

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// One fully-resolved station row, ready for layout and rendering.
///
/// Built once per run by `report::resolve_readings` from a station
/// descriptor joined against the dashboard payload (or a default fill when
/// the station is absent upstream). Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct StationReading {
    /// Row heading, `"{headwork} at {river}"`.
    pub title: String,
    /// Canonical severity, parsed once at ingestion.
    pub severity: Severity,
    /// Formatted discharge, e.g. `"143,700 cusecs"`.
    pub flow: String,
    /// Canonical trend, used for coloring.
    pub trend: Trend,
    /// Trend text as displayed. Usually matches `trend`, but an unmapped
    /// upstream label is shown verbatim (colored as Steady).
    pub trend_label: String,
    /// Short label drawn beside the indicator dot.
    pub short_name: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that abort a report run.
///
/// These are the *fatal* tier of the error model: anything here terminates
/// the process before any output side effect. Degraded conditions (missing
/// logo, absent station, unparsable flow or timestamp) are handled by
/// substitution and a warning, and never surface as a `ReportError`.
#[derive(Debug)]
pub enum ReportError {
    /// FFD_API_URL is not set in the environment.
    MissingApiUrl,
    /// FFD_API_KEY is not set in the environment.
    MissingApiKey,
    /// Non-2xx HTTP response from the dashboard endpoint.
    HttpStatus(u16),
    /// The response body could not be deserialized.
    Decode(String),
    /// The station table override file is malformed or references
    /// out-of-range row indices.
    StationConfig(String),
    /// No usable body/bold font could be located on this host.
    FontUnavailable(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::MissingApiUrl => {
                write!(f, "FFD_API_URL is not set (add it to the environment or .env)")
            }
            ReportError::MissingApiKey => {
                write!(f, "FFD_API_KEY is not set (add it to the environment or .env)")
            }
            ReportError::HttpStatus(code) => write!(f, "dashboard API returned HTTP {}", code),
            ReportError::Decode(msg) => write!(f, "could not decode dashboard payload: {}", msg),
            ReportError::StationConfig(msg) => write!(f, "invalid station table: {}", msg),
            ReportError::FontUnavailable(msg) => write!(f, "no usable font found: {}", msg),
        }
    }
}

impl std::error::Error for ReportError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
