/// Glyph-level text drawing and measurement on the raster canvas.
///
/// Widths are the sum of scaled advance widths plus kerning, the same
/// quantity the layout engine compares against the text column width, so
/// a sentence measured as fitting is drawn exactly as measured.

use image::{Rgba, RgbaImage};
use rusttype::{Font, GlyphId, Point, Scale};

/// Rendered width of `text` at `px`.
pub fn text_width(font: &Font, px: f32, text: &str) -> f32 {
    let scale = Scale::uniform(px);
    let mut width = 0.0;
    let mut last: Option<GlyphId> = None;
    for c in text.chars() {
        let glyph = font.glyph(c).scaled(scale);
        if let Some(prev) = last {
            width += font.pair_kerning(scale, prev, glyph.id());
        }
        last = Some(glyph.id());
        width += glyph.h_metrics().advance_width;
    }
    width
}

/// Draw `text` with its top edge at `y_top`, returning the advance past the
/// last glyph (so styled runs can continue on the same line).
pub fn draw_text(
    img: &mut RgbaImage,
    font: &Font,
    px: f32,
    x: i32,
    y_top: i32,
    color: Rgba<u8>,
    text: &str,
) -> f32 {
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    let baseline = y_top as f32 + v_metrics.ascent;
    let mut caret_x = x as f32;
    let mut last: Option<GlyphId> = None;

    for c in text.chars() {
        let base = font.glyph(c);
        if let Some(prev) = last {
            caret_x += font.pair_kerning(scale, prev, base.id());
        }
        last = Some(base.id());
        let glyph = base.scaled(scale).positioned(Point {
            x: caret_x,
            y: baseline,
        });
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                let px_x = gx as i32 + bb.min.x;
                let px_y = gy as i32 + bb.min.y;
                if px_x < 0 || px_y < 0 {
                    return;
                }
                let (px_x, px_y) = (px_x as u32, px_y as u32);
                if px_x >= img.width() || px_y >= img.height() {
                    return;
                }
                blend(img.get_pixel_mut(px_x, px_y), color, coverage);
            });
        }
        caret_x += glyph.unpositioned().h_metrics().advance_width;
    }

    caret_x - x as f32
}

/// Source-over blend of `color` at `coverage` onto an opaque canvas pixel.
fn blend(dst: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let inv = 1.0 - alpha;
    dst.0[0] = (color.0[0] as f32 * alpha + dst.0[0] as f32 * inv) as u8;
    dst.0[1] = (color.0[1] as f32 * alpha + dst.0[1] as f32 * inv) as u8;
    dst.0[2] = (color.0[2] as f32 * alpha + dst.0[2] as f32 * inv) as u8;
    dst.0[3] = 255;
}

/// Decode a `#RRGGBB` constant into an opaque pixel. The report's palette
/// is a closed set of compile-time constants, so a malformed string is a
/// programming error; it degrades to ink-black rather than panicking.
pub fn hex_color(s: &str) -> Rgba<u8> {
    let stripped = s.trim().trim_start_matches('#');
    match hex::decode(stripped) {
        Ok(bytes) if bytes.len() == 3 => Rgba([bytes[0], bytes[1], bytes[2], 255]),
        _ => {
            debug_assert!(false, "malformed color constant: {}", s);
            Rgba([17, 17, 17, 255])
        }
    }
}
