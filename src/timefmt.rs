/// Report-timestamp handling.
///
/// The dashboard reports times like "09-Sep-2025 13:00 PKT" (older feeds
/// said "PST" for the same zone). The zone abbreviation is decorative: it
/// is stripped, never interpreted, and the service renders wall-clock time
/// as the authority reported it.
///
/// All formatting functions are pure over a `NaiveDateTime`; the
/// current-time fallback for an unparsable timestamp lives in one impure
/// wrapper so display text and filename can fall back independently, and
/// tests stay deterministic.

use chrono::{Datelike, Local, NaiveDateTime, Timelike};

use crate::logging::{self, DataSource};

const SOURCE_FORMAT: &str = "%d-%b-%Y %H:%M";

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Strip a trailing " PST" or " PKT" zone abbreviation.
fn strip_zone(raw: &str) -> &str {
    raw.trim()
        .trim_end_matches(" PST")
        .trim_end_matches(" PKT")
        .trim_end()
}

/// Parse the dashboard's reporting timestamp. `None` when the feed sends
/// something outside the documented format.
pub fn parse_report_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(strip_zone(raw), SOURCE_FORMAT).ok()
}

/// Parse the reporting timestamp, substituting the current local time on
/// failure. `context` names the consumer ("header text", "output filename")
/// in the warning, since the two fall back independently.
pub fn parse_or_now(raw: &str, context: &str) -> NaiveDateTime {
    match parse_report_time(raw) {
        Some(dt) => dt,
        None => {
            logging::warn(
                DataSource::System,
                None,
                &format!(
                    "could not parse report time '{}' for {}, using current time",
                    raw, context
                ),
            );
            Local::now().naive_local()
        }
    }
}

// ---------------------------------------------------------------------------
// Display formatting
// ---------------------------------------------------------------------------

/// Header date and time texts: ("09 Sep 2025", "1:00 PM").
pub fn display_texts(dt: NaiveDateTime) -> (String, String) {
    let date_text = dt.format("%d %b %Y").to_string();
    let time_raw = dt.format("%I:%M %p").to_string();
    let time_text = time_raw.strip_prefix('0').unwrap_or(&time_raw).to_string();
    (date_text, time_text)
}

/// Output filename for the report: `"{day} {Mon} {h12}[-{mm}] {AM|PM}.png"`.
/// Minutes are omitted entirely on the hour, otherwise hyphen-joined:
/// 13:00 → "9 Sep 1 PM.png", 13:30 → "9 Sep 1-30 PM.png".
pub fn output_filename(dt: NaiveDateTime) -> String {
    let (_, hour12) = dt.hour12();
    let meridiem = dt.format("%p");
    if dt.minute() == 0 {
        format!("{} {} {} {}.png", dt.day(), dt.format("%b"), hour12, meridiem)
    } else {
        format!(
            "{} {} {}-{:02} {}.png",
            dt.day(),
            dt.format("%b"),
            hour12,
            dt.minute(),
            meridiem
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
