/// Last-seen report timestamp marker.
///
/// The sole idempotence mechanism: a plain-text file holding the previous
/// run's reporting timestamp verbatim. Comparison is exact string
/// equality; the value is never parsed after being written. The marker is
/// only after the image has been written, so a failed render leaves the
/// last known good value in place.

use std::io;
use std::path::Path;

/// Marker file name, relative to the working directory.
pub const MARKER_FILE: &str = "last_report_time.txt";

/// Read the previously persisted timestamp. `None` on first run (file
/// absent) or when the file cannot be read; either way the run proceeds
/// to render.
pub fn read_last_timestamp(path: &Path) -> Option<String> {
    std::fs::read_to_string(path).ok()
}

/// Whether this run should render: yes unless the current reporting
/// timestamp exactly equals the persisted one.
pub fn should_render(last: Option<&str>, current: &str) -> bool {
    last != Some(current)
}

/// Persist the new timestamp, overwriting the prior value. Stored
/// verbatim, with no trailing newline and no escaping.
pub fn write_timestamp(path: &Path, timestamp: &str) -> io::Result<()> {
    std::fs::write(path, timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_run_renders() {
        assert!(should_render(None, "09-Sep-2025 13:00 PKT"));
    }

    #[test]
    fn test_unchanged_timestamp_skips() {
        assert!(!should_render(
            Some("09-Sep-2025 13:00 PKT"),
            "09-Sep-2025 13:00 PKT"
        ));
    }

    #[test]
    fn test_changed_timestamp_renders() {
        assert!(should_render(
            Some("09-Sep-2025 13:00 PKT"),
            "09-Sep-2025 14:00 PKT"
        ));
    }

    #[test]
    fn test_comparison_is_exact_not_semantic() {
        // "13:00" vs "13:00 " differ as strings, so the run proceeds.
        // Equality is the only contract.
        assert!(should_render(
            Some("09-Sep-2025 13:00 PKT "),
            "09-Sep-2025 13:00 PKT"
        ));
    }

    #[test]
    fn test_round_trip_is_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MARKER_FILE);
        assert_eq!(read_last_timestamp(&path), None);

        write_timestamp(&path, "09-Sep-2025 13:00 PKT").unwrap();
        assert_eq!(
            read_last_timestamp(&path).as_deref(),
            Some("09-Sep-2025 13:00 PKT")
        );

        // overwrite, not append
        write_timestamp(&path, "10-Sep-2025 07:00 PKT").unwrap();
        assert_eq!(
            read_last_timestamp(&path).as_deref(),
            Some("10-Sep-2025 07:00 PKT")
        );
    }
}
