//! System fonts and fontdue-backed measurement.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."

use std::rc::Rc;

use fontdue::{Font, FontSettings};
use sprig_css::{
    ApproximateFontMetrics, FontCache, FontMetrics, FontSpec, FontStyle, FontWeight, LineMetrics,
};

/// Regular faces, most preferred first.
const REGULAR_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
];

const BOLD_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

const ITALIC_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "C:\\Windows\\Fonts\\ariali.ttf",
];

const BOLD_ITALIC_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

/// The four faces of one family. Missing faces fall back to regular.
#[derive(Default)]
pub struct FontSet {
    regular: Option<Font>,
    bold: Option<Font>,
    italic: Option<Font>,
    bold_italic: Option<Font>,
}

impl FontSet {
    /// A set with no faces; text draws nothing and measures approximately.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Search the usual system locations for each face.
    #[must_use]
    pub fn load_system() -> Self {
        let set = Self {
            regular: load_first(REGULAR_PATHS, "regular"),
            bold: load_first(BOLD_PATHS, "bold"),
            italic: load_first(ITALIC_PATHS, "italic"),
            bold_italic: load_first(BOLD_ITALIC_PATHS, "bold-italic"),
        };
        if set.regular.is_none() {
            log::warn!(
                "no system font found in {} locations; text will not be drawn",
                REGULAR_PATHS.len()
            );
        }
        set
    }

    /// Whether at least the regular face is available.
    #[must_use]
    pub const fn has_fonts(&self) -> bool {
        self.regular.is_some()
    }

    /// The best available face for `spec`.
    #[must_use]
    pub fn select(&self, spec: &FontSpec) -> Option<&Font> {
        let bold = spec.weight == FontWeight::Bold;
        let italic = spec.style == FontStyle::Italic;
        let regular = self.regular.as_ref();
        match (bold, italic) {
            (true, true) => self.bold_italic.as_ref().or(self.bold.as_ref()).or(regular),
            (true, false) => self.bold.as_ref().or(regular),
            (false, true) => self.italic.as_ref().or(regular),
            (false, false) => regular,
        }
    }

    /// Distance from the top of a line of `spec` text to its baseline.
    #[must_use]
    pub fn ascent(&self, spec: &FontSpec) -> f32 {
        self.select(spec)
            .and_then(|font| font.horizontal_line_metrics(spec.size))
            .map_or_else(
                || ApproximateFontMetrics.line_metrics(spec).ascent,
                |m| m.ascent,
            )
    }
}

fn load_first(paths: &[&str], label: &str) -> Option<Font> {
    paths.iter().find_map(|path| {
        let data = std::fs::read(path).ok()?;
        let font = Font::from_bytes(data, FontSettings::default()).ok()?;
        log::debug!("loaded {label} font from {path}");
        Some(font)
    })
}

/// Font metrics from fontdue's per-glyph advances and per-face line
/// metrics, falling back to [`ApproximateFontMetrics`] when a face is
/// missing.
pub struct FontdueFontMetrics {
    fonts: Rc<FontSet>,
}

impl FontdueFontMetrics {
    /// Measure with the faces in `fonts`.
    #[must_use]
    pub const fn new(fonts: Rc<FontSet>) -> Self {
        Self { fonts }
    }
}

impl FontMetrics for FontdueFontMetrics {
    fn text_width(&self, text: &str, font: &FontSpec) -> f32 {
        let Some(face) = self.fonts.select(font) else {
            return ApproximateFontMetrics.text_width(text, font);
        };
        // Matches the cursor advance in Renderer::text.
        text.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| face.metrics(ch, font.size).advance_width)
            .sum()
    }

    fn line_metrics(&self, font: &FontSpec) -> LineMetrics {
        let Some(metrics) = self
            .fonts
            .select(font)
            .and_then(|face| face.horizontal_line_metrics(font.size))
        else {
            return ApproximateFontMetrics.line_metrics(font);
        };
        LineMetrics {
            ascent: metrics.ascent,
            descent: -metrics.descent,
            linespace: metrics.new_line_size,
        }
    }
}

/// A measurement cache over `fonts`, or over approximate metrics when no
/// face was found.
#[must_use]
pub fn font_cache(fonts: &Rc<FontSet>) -> FontCache {
    if fonts.has_fonts() {
        FontCache::new(Box::new(FontdueFontMetrics::new(Rc::clone(fonts))))
    } else {
        FontCache::approximate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_measures_approximately() {
        let metrics = FontdueFontMetrics::new(Rc::new(FontSet::empty()));
        let spec = FontSpec::default();
        assert!((metrics.text_width("abc", &spec) - 3.0 * 9.6).abs() < 1e-3);
        assert_eq!(
            metrics.line_metrics(&spec),
            ApproximateFontMetrics.line_metrics(&spec)
        );
    }

    #[test]
    fn test_empty_set_selects_nothing() {
        let fonts = FontSet::empty();
        assert!(!fonts.has_fonts());
        assert!(fonts.select(&FontSpec::default()).is_none());
        assert!((fonts.ascent(&FontSpec::default()) - 12.0).abs() < 1e-3);
    }
}
