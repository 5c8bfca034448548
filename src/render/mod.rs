/// Report renderer.
///
/// Paints the finished plan onto an RGBA canvas in a fixed order: header
/// band (with optional logo), title/date block, separator, station rows,
/// indicator dots and labels, river connectors, footer band, then
/// serializes to PNG. All positions come from the layout plan; this module
/// adds no geometry decisions beyond pixel fills.

pub mod fonts;
pub mod text;

use std::path::Path;

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};

use crate::layout::{
    BODY_LINE_H, BODY_PX, DATE_PX, DOT_R, H1_PX, HEADER_H, LABEL_INK, LABEL_PADX, LABEL_PX,
    CONNECTOR_COLOR, CONNECTOR_W, INK, MARGIN_L, RenderPlan, SEP_H, TITLE_PX,
};
use crate::logging::{self, DataSource};
use crate::model::StationReading;
use fonts::Fonts;
use text::{draw_text, hex_color, text_width};

// ---------------------------------------------------------------------------
// Palette and header copy
// ---------------------------------------------------------------------------

const BG: &str = "#FFF9F0";
const HEADER_GREEN: &str = "#0A6B46";
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

const TITLE_LINE_1: &str = "NEOC Daily Rivers";
const TITLE_LINE_2: &str = "Situation Update";

/// Logo asset, looked up in the working directory. Absence is non-fatal.
pub const LOGO_FILE: &str = "ndma_logo.png";
const LOGO_SIZE: u32 = 170;
const LOGO_GAP: i32 = 30;

const LEAD_AFTER_LINE_1: i32 = 10;
const LEAD_AFTER_LINE_2: i32 = 20;
const DATE_TIME_GAP: f32 = 60.0;

// ---------------------------------------------------------------------------
// Raster primitives
// ---------------------------------------------------------------------------

/// Fill the half-open rectangle x0..x1 × y0..y1, clamped to the canvas.
fn fill_rect(img: &mut RgbaImage, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba<u8>) {
    let x0 = x0.max(0) as u32;
    let y0 = y0.max(0) as u32;
    let x1 = (x1.max(0) as u32).min(img.width());
    let y1 = (y1.max(0) as u32).min(img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, color);
        }
    }
}

/// Fill a disc of radius `r` centered at (cx, cy).
fn fill_circle(img: &mut RgbaImage, cx: i32, cy: i32, r: i32, color: Rgba<u8>) {
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if x < 0 || y < 0 || x as u32 >= img.width() || y as u32 >= img.height() {
                continue;
            }
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Paint the complete report.
///
/// `readings` and `plan.rows` are index-aligned (both come from the same
/// table order). `logo_path` is attempted once; on any failure the header
/// text block re-centers into the full header width.
pub fn render_report(
    readings: &[StationReading],
    plan: &RenderPlan,
    date_text: &str,
    time_text: &str,
    fonts: &Fonts,
    logo_path: &Path,
) -> RgbaImage {
    let w = plan.canvas_w;
    let h = plan.canvas_h;
    let mut img = RgbaImage::from_pixel(w, h, hex_color(BG));

    draw_header(&mut img, date_text, time_text, fonts, logo_path);

    // White separator under the header band
    fill_rect(&mut img, 0, HEADER_H, w as i32, HEADER_H + SEP_H, WHITE);

    // Station rows
    let ink = hex_color(INK);
    for (reading, row) in readings.iter().zip(&plan.rows) {
        draw_text(
            &mut img,
            &fonts.bold,
            H1_PX,
            MARGIN_L,
            row.row_top_y,
            ink,
            &format!("{}:", reading.title),
        );

        for (line_no, line) in row.status_lines.iter().enumerate() {
            let y = row.status_top_y + line_no as i32 * BODY_LINE_H;
            let mut cx = MARGIN_L as f32;
            for run in line {
                let advance = draw_text(
                    &mut img,
                    fonts.face(run.bold),
                    BODY_PX,
                    cx.round() as i32,
                    y,
                    hex_color(run.color),
                    &run.text,
                );
                cx += advance;
            }
        }
    }

    // Indicator dots and short labels
    let label_ink = hex_color(LABEL_INK);
    for (reading, row) in readings.iter().zip(&plan.rows) {
        fill_circle(
            &mut img,
            plan.dot_x,
            row.dot_center_y,
            DOT_R,
            hex_color(reading.severity.color_hex()),
        );
        draw_text(
            &mut img,
            &fonts.bold,
            LABEL_PX,
            plan.dot_x + LABEL_PADX,
            row.dot_center_y - LABEL_PX as i32 / 2,
            label_ink,
            &reading.short_name,
        );
    }

    // River connectors (between dot edges, never across the circles)
    let connector = hex_color(CONNECTOR_COLOR);
    for segment in &plan.connectors {
        fill_rect(
            &mut img,
            plan.dot_x - CONNECTOR_W / 2,
            segment.y_top,
            plan.dot_x + CONNECTOR_W / 2,
            segment.y_bottom,
            connector,
        );
    }

    // Footer band
    fill_rect(
        &mut img,
        0,
        h as i32 - crate::layout::BOTTOM_BAR_H,
        w as i32,
        h as i32,
        hex_color(HEADER_GREEN),
    );

    img
}

/// Header band: green field, optional logo, and the three-line title block
/// centered as a unit in whatever width the logo leaves available.
fn draw_header(
    img: &mut RgbaImage,
    date_text: &str,
    time_text: &str,
    fonts: &Fonts,
    logo_path: &Path,
) {
    let w = img.width() as i32;
    fill_rect(img, 0, 0, w, HEADER_H, hex_color(HEADER_GREEN));

    let logo_x = MARGIN_L;
    let logo_y = (HEADER_H - LOGO_SIZE as i32) / 2;
    let has_logo = match image::open(logo_path) {
        Ok(logo) => {
            let resized = image::imageops::resize(
                &logo.to_rgba8(),
                LOGO_SIZE,
                LOGO_SIZE,
                FilterType::Lanczos3,
            );
            image::imageops::overlay(img, &resized, logo_x as i64, logo_y as i64);
            true
        }
        Err(e) => {
            logging::warn(
                DataSource::Render,
                None,
                &format!("logo '{}' unavailable ({}), centering header text", logo_path.display(), e),
            );
            false
        }
    };

    let (text_start_x, available_width) = if has_logo {
        let start = logo_x + LOGO_SIZE as i32 + LOGO_GAP;
        (start, w - start - MARGIN_L)
    } else {
        (MARGIN_L, w - 2 * MARGIN_L)
    };

    let line1_w = text_width(&fonts.bold, TITLE_PX, TITLE_LINE_1);
    let line2_w = text_width(&fonts.bold, TITLE_PX, TITLE_LINE_2);
    let date_w = text_width(&fonts.bold, DATE_PX, date_text);
    let time_w = text_width(&fonts.bold, DATE_PX, time_text);
    let date_time_w = date_w + DATE_TIME_GAP + time_w;

    let block_w = line1_w.max(line2_w).max(date_time_w);
    let block_x = text_start_x as f32 + (available_width as f32 - block_w) / 2.0;

    let block_h = TITLE_PX as i32 + LEAD_AFTER_LINE_1 + TITLE_PX as i32 + LEAD_AFTER_LINE_2
        + DATE_PX as i32;
    let mut y = (HEADER_H - block_h) / 2;

    let line1_x = (block_x + (block_w - line1_w) / 2.0).round() as i32;
    draw_text(img, &fonts.bold, TITLE_PX, line1_x, y, WHITE, TITLE_LINE_1);

    y += TITLE_PX as i32 + LEAD_AFTER_LINE_1;
    let line2_x = (block_x + (block_w - line2_w) / 2.0).round() as i32;
    draw_text(img, &fonts.bold, TITLE_PX, line2_x, y, WHITE, TITLE_LINE_2);

    y += TITLE_PX as i32 + LEAD_AFTER_LINE_2;
    let date_x = block_x + (block_w - date_time_w) / 2.0;
    draw_text(img, &fonts.bold, DATE_PX, date_x.round() as i32, y, WHITE, date_text);
    let time_x = date_x + date_w + DATE_TIME_GAP;
    draw_text(img, &fonts.bold, DATE_PX, time_x.round() as i32, y, WHITE, time_text);
}

/// Serialize the finished canvas. The format follows the `.png` extension
/// of the derived filename.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    img.save(path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_is_half_open_and_clamped() {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let red = Rgba([255, 0, 0, 255]);
        fill_rect(&mut img, 2, 2, 4, 4, red);
        assert_eq!(*img.get_pixel(2, 2), red);
        assert_eq!(*img.get_pixel(3, 3), red);
        assert_eq!(*img.get_pixel(4, 4), Rgba([0, 0, 0, 255]), "end is exclusive");

        // Out-of-range rectangles clamp instead of panicking.
        fill_rect(&mut img, -5, -5, 100, 1, red);
        assert_eq!(*img.get_pixel(0, 0), red);
        assert_eq!(*img.get_pixel(9, 0), red);
    }

    #[test]
    fn test_fill_circle_covers_center_and_respects_radius() {
        let mut img = RgbaImage::from_pixel(50, 50, Rgba([0, 0, 0, 255]));
        let green = Rgba([0, 255, 0, 255]);
        fill_circle(&mut img, 25, 25, 5, green);
        assert_eq!(*img.get_pixel(25, 25), green);
        assert_eq!(*img.get_pixel(25, 30), green, "radius is inclusive");
        assert_eq!(*img.get_pixel(25, 31), Rgba([0, 0, 0, 255]));
        assert_eq!(*img.get_pixel(31, 31), Rgba([0, 0, 0, 255]), "corners stay outside");
    }

    #[test]
    fn test_fill_circle_clamps_at_edges() {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        fill_circle(&mut img, 0, 0, 5, Rgba([0, 0, 255, 255]));
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
    }
}
