/// Portable font discovery.
///
/// The report is typeset in the platform UI font: Segoe UI on Windows,
/// DejaVu Sans on Linux, with a macOS supplemental fallback. First readable
/// candidate wins. There is no bundled fallback; text cannot be measured
/// or drawn without a real font, so exhausting every candidate is a fatal
/// startup error (reported with the searched paths).

use rusttype::Font;

use crate::layout::TextMeasure;
use crate::model::ReportError;
use crate::render::text;

const REGULAR_CANDIDATES: &[&str] = &[
    "C:/Windows/Fonts/segoeui.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

const BOLD_CANDIDATES: &[&str] = &[
    "C:/Windows/Fonts/segoeuib.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
];

/// The two faces every piece of report text uses. Sizes are chosen per
/// call site (see the layout constants); rusttype scales at draw time.
pub struct Fonts {
    pub regular: Font<'static>,
    pub bold: Font<'static>,
}

impl Fonts {
    /// Locate and load both faces from the platform candidates.
    pub fn load() -> Result<Fonts, ReportError> {
        let regular = pick_font(REGULAR_CANDIDATES)
            .ok_or_else(|| ReportError::FontUnavailable(REGULAR_CANDIDATES.join(", ")))?;
        let bold = pick_font(BOLD_CANDIDATES)
            .ok_or_else(|| ReportError::FontUnavailable(BOLD_CANDIDATES.join(", ")))?;
        Ok(Fonts { regular, bold })
    }

    pub fn face(&self, bold: bool) -> &Font<'static> {
        if bold { &self.bold } else { &self.regular }
    }
}

impl TextMeasure for Fonts {
    fn width(&self, text: &str, px: f32, bold: bool) -> f32 {
        text::text_width(self.face(bold), px, text)
    }
}

/// First candidate that exists and parses as a font.
fn pick_font(paths: &[&str]) -> Option<Font<'static>> {
    for path in paths {
        if let Ok(bytes) = std::fs::read(path) {
            if let Some(font) = Font::try_from_vec(bytes) {
                return Some(font);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fonts_name_the_search_paths() {
        let err = ReportError::FontUnavailable(REGULAR_CANDIDATES.join(", "));
        let msg = err.to_string();
        assert!(msg.contains("DejaVuSans.ttf"));
        assert!(msg.contains("segoeui.ttf"));
    }

    #[test]
    fn test_pick_font_skips_nonexistent_paths() {
        assert!(pick_font(&["/definitely/not/here.ttf"]).is_none());
    }
}
