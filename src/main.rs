/// Process entry point: one report run per invocation.
///
/// Exit codes: 0 for a completed render *or* a correctly skipped run
/// (reporting timestamp unchanged); non-zero for fatal configuration,
/// network, or output errors. Degraded conditions (missing logo, absent
/// stations, unparsable values) warn and continue.

use std::env;
use std::path::Path;

use flograph_service::ingest::ffd;
use flograph_service::logging::{self, DataSource, LogLevel};
use flograph_service::model::ReportError;
use flograph_service::render::{self, fonts::Fonts};
use flograph_service::stations::StationTable;
use flograph_service::{layout, report, state, timefmt, verify};

/// Station table override, looked up in the working directory.
const STATIONS_FILE: &str = "stations.toml";

fn main() {
    dotenv::dotenv().ok();
    let log_file = env::var("FLOGRAPH_LOG_FILE").ok();
    logging::init_logger(LogLevel::Info, log_file.as_deref());

    if let Err(e) = run() {
        logging::error(DataSource::System, None, &e.to_string());
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let verify_mode = env::args().any(|a| a == "--verify");

    let url = env::var("FFD_API_URL").map_err(|_| ReportError::MissingApiUrl)?;
    let api_key = env::var("FFD_API_KEY").map_err(|_| ReportError::MissingApiKey)?;
    let table = StationTable::load(Path::new(STATIONS_FILE))?;

    logging::info(DataSource::Ffd, None, "Fetching dashboard data...");
    let client = ffd::build_client()?;
    let payload = ffd::fetch_dashboard(&client, &url, &api_key)?;

    if verify_mode {
        let verification = verify::verify_stations(&table, &payload);
        verify::print_report(&verification);
        return Ok(());
    }

    // Changed-since-last-run gate: the one idempotence mechanism.
    let marker = Path::new(state::MARKER_FILE);
    let last = state::read_last_timestamp(marker);
    if !state::should_render(last.as_deref(), &payload.latest_reading_time) {
        logging::info(
            DataSource::State,
            None,
            &format!(
                "report time unchanged ({}), nothing to render",
                payload.latest_reading_time
            ),
        );
        return Ok(());
    }

    logging::info(DataSource::Ffd, None, "Processing data...");
    let readings = report::resolve_readings(&table, &payload);

    let fonts = Fonts::load()?;
    let plan = layout::build_plan(&readings, &table, &fonts);

    // Header date/time text falls back to current time independently of
    // the filename below.
    let display_dt = timefmt::parse_or_now(&payload.latest_reading_time, "header text");
    let (date_text, time_text) = timefmt::display_texts(display_dt);

    logging::info(DataSource::Render, None, "Generating image...");
    let img = render::render_report(
        &readings,
        &plan,
        &date_text,
        &time_text,
        &fonts,
        Path::new(render::LOGO_FILE),
    );

    let file_dt = timefmt::parse_or_now(&payload.latest_reading_time, "output filename");
    let outfile = timefmt::output_filename(file_dt);
    render::save_png(&img, Path::new(&outfile))?;
    logging::info(DataSource::Render, None, &format!("Saved {}", outfile));

    // Persist the gate only after the image is on disk.
    state::write_timestamp(marker, &payload.latest_reading_time)?;
    Ok(())
}
