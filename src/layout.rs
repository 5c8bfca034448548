/// Layout engine for the situation report.
///
/// Pure computation: given the resolved readings and the group table, this
/// module decides canvas dimensions, every row's vertical placement, the
/// one-line/two-line split of the status sentence, and the geometry of the
/// indicator dots and their connector segments. No pixels are touched here;
/// the renderer paints exactly what this plan says.
///
/// # Text measurement
/// Wrap decisions need rendered text widths, which depend on the loaded
/// fonts. The engine takes the measurement through the `TextMeasure` trait
/// so the geometry is fully deterministic under test without any font
/// files on the machine.

use crate::model::StationReading;
use crate::stations::StationTable;

// ---------------------------------------------------------------------------
// Canvas constants
// ---------------------------------------------------------------------------

pub const CANVAS_W: u32 = 1080;
/// The canvas never shrinks below the classic fixed-height report.
pub const MIN_CANVAS_H: u32 = 1920;

pub const MARGIN_L: i32 = 48;
/// Width of the status text column; the wrap decision tests against this.
pub const TEXT_W: f32 = 690.0;
pub const TITLE_GAP: i32 = 12;
pub const ROW_GAP: i32 = 24;
/// Extra gap inserted after the last row of each river group.
pub const GROUP_GAP: i32 = 28;

pub const HEADER_H: i32 = 250;
pub const SEP_H: i32 = 13;
pub const TOP_MARGIN: i32 = 26;
pub const BOTTOM_BAR_H: i32 = 32;
/// Slack below the last row so descenders and the footer never collide.
pub const SAFETY_PAD: i32 = 40;

/// Indicator dot column sits this far left of the right edge.
pub const DOT_COL_OFFSET: i32 = 230;
pub const DOT_R: i32 = 24;
pub const CONNECTOR_W: i32 = 6;
pub const LABEL_PADX: i32 = 44;

// Font pixel sizes
pub const TITLE_PX: f32 = 62.0;
pub const DATE_PX: f32 = 38.0;
pub const H1_PX: f32 = 48.0;
pub const BODY_PX: f32 = 34.0;
pub const LABEL_PX: f32 = 28.0;

/// Body line advance (1.35 leading).
pub const BODY_LINE_H: i32 = (BODY_PX * 1.35) as i32;

pub const INK: &str = "#111111";
pub const LABEL_INK: &str = "#1a1a1a";
pub const CONNECTOR_COLOR: &str = "#222222";

// ---------------------------------------------------------------------------
// Text measurement seam
// ---------------------------------------------------------------------------

/// Rendered width of a piece of text at a given pixel size.
pub trait TextMeasure {
    fn width(&self, text: &str, px: f32, bold: bool) -> f32;
}

// ---------------------------------------------------------------------------
// Plan types
// ---------------------------------------------------------------------------

/// One styled fragment of the status sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledRun {
    pub text: String,
    pub bold: bool,
    pub color: &'static str,
}

impl StyledRun {
    fn new(text: impl Into<String>, bold: bool, color: &'static str) -> StyledRun {
        StyledRun {
            text: text.into(),
            bold,
            color,
        }
    }
}

/// Vertical placement of one station row plus its typeset status lines.
#[derive(Debug, Clone)]
pub struct RowPlan {
    /// Top of the row's title text.
    pub row_top_y: i32,
    /// Top of the first status line.
    pub status_top_y: i32,
    /// Bottom edge of the status block (after one or two line advances).
    pub status_bottom_y: i32,
    /// Vertical center of the indicator dot: always the midpoint of
    /// `row_top_y..status_bottom_y`, wrapped or not.
    pub dot_center_y: i32,
    pub wrapped: bool,
    /// One or two lines of styled runs, ready to paint.
    pub status_lines: Vec<Vec<StyledRun>>,
}

/// A vertical connector between two dots in the same river group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connector {
    pub y_top: i32,
    pub y_bottom: i32,
}

/// Everything the renderer needs to paint the body of the report.
#[derive(Debug, Clone)]
pub struct RenderPlan {
    pub canvas_w: u32,
    pub canvas_h: u32,
    /// X of the indicator dot column center.
    pub dot_x: i32,
    pub rows: Vec<RowPlan>,
    pub connectors: Vec<Connector>,
}

// ---------------------------------------------------------------------------
// Status sentence composition
// ---------------------------------------------------------------------------

/// The complete status sentence as measured for the wrap decision.
pub fn status_sentence(r: &StationReading) -> String {
    format!(
        "Status – {} Flood ({}) and {} Trend",
        r.severity.label(),
        r.flow,
        r.trend_label
    )
}

/// The seven styled runs of a one-line status.
fn one_line_runs(r: &StationReading) -> Vec<StyledRun> {
    vec![
        StyledRun::new("Status – ", true, INK),
        StyledRun::new(
            format!("{} Flood", r.severity.label()),
            true,
            r.severity.color_hex(),
        ),
        StyledRun::new(" (", false, INK),
        StyledRun::new(r.flow.clone(), true, INK),
        StyledRun::new(") and ", false, INK),
        StyledRun::new(r.trend_label.clone(), true, r.trend.color_hex()),
        StyledRun::new(" Trend", false, INK),
    ]
}

/// The two-line split. The break point is fixed: line one always ends with
/// the closing parenthesis after the flow, line two always begins with
/// "and". No re-measuring and no re-balancing, regardless of which operand
/// caused the overflow.
fn two_line_runs(r: &StationReading) -> Vec<Vec<StyledRun>> {
    vec![
        vec![
            StyledRun::new("Status – ", true, INK),
            StyledRun::new(
                format!("{} Flood", r.severity.label()),
                true,
                r.severity.color_hex(),
            ),
            StyledRun::new(" (", false, INK),
            StyledRun::new(r.flow.clone(), true, INK),
            StyledRun::new(")", false, INK),
        ],
        vec![
            StyledRun::new("and ", false, INK),
            StyledRun::new(r.trend_label.clone(), true, r.trend.color_hex()),
            StyledRun::new(" Trend", false, INK),
        ],
    ]
}

// ---------------------------------------------------------------------------
// Canvas height
// ---------------------------------------------------------------------------

/// Derived canvas height for `n_rows` rows with `boundary_gaps` interior
/// group boundaries. Every row reserves the two-line worst case so the
/// canvas never underestimates, even when most rows render on one line.
pub fn canvas_height(n_rows: usize, boundary_gaps: usize) -> u32 {
    let per_row = H1_PX as i32 + TITLE_GAP + 2 * BODY_LINE_H + ROW_GAP;
    let content = HEADER_H
        + SEP_H
        + TOP_MARGIN
        + n_rows as i32 * per_row
        + boundary_gaps as i32 * GROUP_GAP
        + BOTTOM_BAR_H
        + SAFETY_PAD;
    (content as u32).max(MIN_CANVAS_H)
}

// ---------------------------------------------------------------------------
// Plan construction
// ---------------------------------------------------------------------------

/// Lay out the full report body.
pub fn build_plan(
    readings: &[StationReading],
    table: &StationTable,
    measure: &dyn TextMeasure,
) -> RenderPlan {
    let group_ends = table.group_ends();
    let boundary_gaps = group_ends
        .iter()
        .filter(|&&end| end + 1 < readings.len())
        .count();

    let mut rows = Vec::with_capacity(readings.len());
    let mut y = HEADER_H + SEP_H + TOP_MARGIN;

    for (i, reading) in readings.iter().enumerate() {
        let row_top_y = y;
        let status_top_y = row_top_y + H1_PX as i32 + TITLE_GAP;

        let wrapped = measure.width(&status_sentence(reading), BODY_PX, false) > TEXT_W;
        let status_lines = if wrapped {
            two_line_runs(reading)
        } else {
            vec![one_line_runs(reading)]
        };
        let status_bottom_y = status_top_y + status_lines.len() as i32 * BODY_LINE_H;

        rows.push(RowPlan {
            row_top_y,
            status_top_y,
            status_bottom_y,
            dot_center_y: (row_top_y + status_bottom_y) / 2,
            wrapped,
            status_lines,
        });

        y = status_bottom_y + ROW_GAP;
        if group_ends.contains(&i) && i + 1 < readings.len() {
            y += GROUP_GAP;
        }
    }

    let connectors = connector_segments(&rows, &table.groups);

    RenderPlan {
        canvas_w: CANVAS_W,
        canvas_h: canvas_height(readings.len(), boundary_gaps),
        dot_x: CANVAS_W as i32 - DOT_COL_OFFSET,
        rows,
        connectors,
    }
}

/// One segment per consecutive index pair within a group, running from the
/// bottom edge of the upper dot to the top edge of the lower dot; the
/// segments never cross the circles. Rows outside every group get nothing.
fn connector_segments(rows: &[RowPlan], groups: &[Vec<usize>]) -> Vec<Connector> {
    let mut segments = Vec::new();
    for group in groups {
        for pair in group.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a >= rows.len() || b >= rows.len() {
                continue;
            }
            segments.push(Connector {
                y_top: rows[a].dot_center_y + DOT_R,
                y_bottom: rows[b].dot_center_y - DOT_R,
            });
        }
    }
    segments
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
