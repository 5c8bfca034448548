/// Station registry for the daily rivers situation report.
///
/// Defines the ordered list of headworks rendered on the infographic and
/// the river groupings that receive connector lines. This is the single
/// source of truth for row order; layout and rendering index into this
/// table and never hardcode station names.
///
/// The set of monitored stations evolves (a later revision of the report
/// added two stations and a standalone gauge), so the table can be replaced
/// at runtime by a `stations.toml` file in the working directory. The
/// compiled-in default below is the nine-station table.

use std::path::Path;

use serde::Deserialize;

use crate::model::ReportError;

// ---------------------------------------------------------------------------
// Built-in registry
// ---------------------------------------------------------------------------

/// Metadata for a single monitored headwork.
pub struct StationDescriptor {
    /// Stable identifier, also the lookup key into the dashboard payload.
    pub api_name: &'static str,
    /// River the headwork sits on. Groups follow rivers, but grouping is
    /// driven by `RIVER_GROUPS`, never derived from this field.
    pub river: &'static str,
    /// Headwork/barrage name as shown in the row title.
    pub headwork: &'static str,
    /// Abbreviated label drawn beside the indicator dot.
    pub short_name: &'static str,
}

/// Default station table, in render order (top to bottom). Order is
/// significant: `RIVER_GROUPS` refers to rows by index.
pub static STATION_REGISTRY: &[StationDescriptor] = &[
    StationDescriptor {
        api_name: "Jassar",
        river: "Ravi",
        headwork: "Jassar",
        short_name: "Jassar",
    },
    StationDescriptor {
        api_name: "Shahdara",
        river: "Ravi",
        headwork: "Shahdara",
        short_name: "Shahdara",
    },
    StationDescriptor {
        api_name: "Balloki",
        river: "Ravi",
        headwork: "Balloki",
        short_name: "Balloki",
    },
    StationDescriptor {
        api_name: "Marala",
        river: "Chenab",
        headwork: "Marala",
        short_name: "Marala",
    },
    StationDescriptor {
        api_name: "Trimmu",
        river: "Chenab",
        headwork: "Trimmu",
        short_name: "Trimmu",
    },
    StationDescriptor {
        api_name: "Panjnad",
        river: "Chenab",
        headwork: "Panjnad",
        short_name: "Panjnad",
    },
    StationDescriptor {
        api_name: "Guddu",
        river: "Indus",
        headwork: "Guddu",
        short_name: "Guddu",
    },
    StationDescriptor {
        api_name: "Ganda Singh Wala",
        river: "Sutlej",
        headwork: "Ganda Singh Wala",
        short_name: "G. S. Wala",
    },
    StationDescriptor {
        api_name: "Sulemanki",
        river: "Sutlej",
        headwork: "Sulemanki",
        short_name: "Sulemanki",
    },
];

/// Row indices along the same river, in flow order. Consecutive pairs in a
/// group are joined by a connector line. A row absent from every group is
/// rendered standalone (dot and label only).
pub static RIVER_GROUPS: &[&[usize]] = &[&[0, 1, 2], &[3, 4, 5, 6], &[7, 8]];

// ---------------------------------------------------------------------------
// Runtime table (built-in or loaded from stations.toml)
// ---------------------------------------------------------------------------

/// One station entry of the active table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StationEntry {
    pub api_name: String,
    pub river: String,
    pub headwork: String,
    pub short_name: String,
}

impl StationEntry {
    /// Row heading as rendered, e.g. "Jassar at Ravi".
    pub fn title(&self) -> String {
        format!("{} at {}", self.headwork, self.river)
    }
}

/// The active station table: ordered stations plus the group index lists.
#[derive(Debug, Clone)]
pub struct StationTable {
    pub stations: Vec<StationEntry>,
    pub groups: Vec<Vec<usize>>,
}

#[derive(Debug, Deserialize)]
struct StationFile {
    #[serde(rename = "station")]
    stations: Vec<StationEntry>,
    #[serde(default)]
    groups: Vec<Vec<usize>>,
}

impl StationTable {
    /// The compiled-in nine-station table.
    pub fn builtin() -> StationTable {
        StationTable {
            stations: STATION_REGISTRY
                .iter()
                .map(|s| StationEntry {
                    api_name: s.api_name.to_string(),
                    river: s.river.to_string(),
                    headwork: s.headwork.to_string(),
                    short_name: s.short_name.to_string(),
                })
                .collect(),
            groups: RIVER_GROUPS.iter().map(|g| g.to_vec()).collect(),
        }
    }

    /// Parse a `stations.toml` document. Group indices must be in range;
    /// a table that references a nonexistent row is rejected outright
    /// rather than silently dropping connectors.
    pub fn from_toml_str(text: &str) -> Result<StationTable, ReportError> {
        let file: StationFile =
            toml::from_str(text).map_err(|e| ReportError::StationConfig(e.to_string()))?;
        if file.stations.is_empty() {
            return Err(ReportError::StationConfig(
                "station list is empty".to_string(),
            ));
        }
        for group in &file.groups {
            for &idx in group {
                if idx >= file.stations.len() {
                    return Err(ReportError::StationConfig(format!(
                        "group index {} out of range (have {} stations)",
                        idx,
                        file.stations.len()
                    )));
                }
            }
        }
        Ok(StationTable {
            stations: file.stations,
            groups: file.groups,
        })
    }

    /// Load the table for this run: `stations.toml` if present in the
    /// working directory, otherwise the built-in default. A present but
    /// malformed file is a fatal configuration error, not a fallback.
    pub fn load(path: &Path) -> Result<StationTable, ReportError> {
        if !path.exists() {
            return Ok(StationTable::builtin());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ReportError::StationConfig(format!("{}: {}", path.display(), e)))?;
        StationTable::from_toml_str(&text)
    }

    /// Last row index of each group, in group order. Layout inserts an
    /// extra vertical gap after these rows.
    pub fn group_ends(&self) -> Vec<usize> {
        self.groups.iter().filter_map(|g| g.last().copied()).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_duplicate_api_names() {
        let mut seen = std::collections::HashSet::new();
        for station in STATION_REGISTRY {
            assert!(
                seen.insert(station.api_name),
                "duplicate api_name '{}' in STATION_REGISTRY",
                station.api_name
            );
        }
    }

    #[test]
    fn test_builtin_groups_reference_valid_rows() {
        for group in RIVER_GROUPS {
            for &idx in group.iter() {
                assert!(
                    idx < STATION_REGISTRY.len(),
                    "group index {} out of range",
                    idx
                );
            }
        }
    }

    #[test]
    fn test_builtin_groups_follow_rivers() {
        // Each group must contain stations of a single river, in table
        // order, so the connector diagram reads as "downstream along river X".
        for group in RIVER_GROUPS {
            let rivers: Vec<_> = group.iter().map(|&i| STATION_REGISTRY[i].river).collect();
            assert!(
                rivers.windows(2).all(|w| w[0] == w[1]),
                "group {:?} spans rivers {:?}",
                group,
                rivers
            );
            assert!(
                group.windows(2).all(|w| w[0] < w[1]),
                "group {:?} is not in ascending row order",
                group
            );
        }
    }

    #[test]
    fn test_registry_contains_expected_headworks() {
        let expected = [
            "Jassar",
            "Shahdara",
            "Balloki",
            "Marala",
            "Trimmu",
            "Panjnad",
            "Guddu",
            "Ganda Singh Wala",
            "Sulemanki",
        ];
        let names: Vec<_> = STATION_REGISTRY.iter().map(|s| s.api_name).collect();
        for name in expected {
            assert!(names.contains(&name), "registry missing '{}'", name);
        }
    }

    #[test]
    fn test_builtin_table_matches_registry() {
        let table = StationTable::builtin();
        assert_eq!(table.stations.len(), STATION_REGISTRY.len());
        assert_eq!(table.groups.len(), RIVER_GROUPS.len());
        assert_eq!(table.stations[7].short_name, "G. S. Wala");
        assert_eq!(table.stations[0].title(), "Jassar at Ravi");
    }

    #[test]
    fn test_group_ends() {
        let table = StationTable::builtin();
        assert_eq!(table.group_ends(), vec![2, 6, 8]);
    }

    #[test]
    fn test_toml_override_parses() {
        let text = r#"
            groups = [[0, 1]]

            [[station]]
            api_name = "Tarbela"
            river = "Indus"
            headwork = "Tarbela"
            short_name = "Tarbela"

            [[station]]
            api_name = "Kalabagh"
            river = "Indus"
            headwork = "Kalabagh"
            short_name = "Kalabagh"
        "#;
        let table = StationTable::from_toml_str(text).expect("valid table should parse");
        assert_eq!(table.stations.len(), 2);
        assert_eq!(table.groups, vec![vec![0, 1]]);
        assert_eq!(table.stations[0].title(), "Tarbela at Indus");
    }

    #[test]
    fn test_toml_override_rejects_out_of_range_group_index() {
        let text = r#"
            groups = [[0, 5]]

            [[station]]
            api_name = "Tarbela"
            river = "Indus"
            headwork = "Tarbela"
            short_name = "Tarbela"
        "#;
        let err = StationTable::from_toml_str(text).unwrap_err();
        assert!(
            err.to_string().contains("out of range"),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn test_toml_override_rejects_empty_station_list() {
        let err = StationTable::from_toml_str("station = []").unwrap_err();
        assert!(err.to_string().contains("invalid station table"));
    }

    #[test]
    fn test_load_falls_back_to_builtin_when_file_absent() {
        let table = StationTable::load(Path::new("/nonexistent/stations.toml"))
            .expect("absent file should fall back to builtin");
        assert_eq!(table.stations.len(), 9);
    }
}
