/// Daily rivers situation-report generator.
///
/// Fetches the flood forecasting authority's gauge dashboard, decides
/// whether anything changed since the last run, and renders the station
/// table as a fixed-layout infographic PNG. Modules are layered in
/// pipeline order: ingest → report (resolution) → layout → render, with
/// state/timefmt/logging as collaborators.

pub mod ingest;
pub mod layout;
pub mod logging;
pub mod model;
pub mod render;
pub mod report;
pub mod state;
pub mod stations;
pub mod timefmt;
pub mod verify;
