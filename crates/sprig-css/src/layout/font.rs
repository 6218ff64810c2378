//! Font measurement
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! Layout never talks to a font library directly. It measures through a
//! [`FontCache`], which wraps whichever [`FontMetrics`] implementation the
//! embedder supplies and memoises per-face line metrics.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::style::{ComputedStyle, FontStyle, FontWeight};

/// The font face text is set in: size in pixels, weight, and style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontSpec {
    /// Font size in pixels.
    pub size: f32,
    /// Weight face.
    pub weight: FontWeight,
    /// Slant face.
    pub style: FontStyle,
}

impl FontSpec {
    /// The face a computed style asks for.
    #[must_use]
    pub fn from_style(style: &ComputedStyle) -> Self {
        Self {
            size: style.font_size_px(),
            weight: style.font_weight(),
            style: style.font_style(),
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::from_style(&ComputedStyle::default())
    }
}

// Sizes come from parsed lengths and are never NaN.
impl Eq for FontSpec {}

impl Hash for FontSpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.size.to_bits().hash(state);
        self.weight.hash(state);
        self.style.hash(state);
    }
}

/// Vertical metrics of a face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    /// Height above the baseline.
    pub ascent: f32,
    /// Depth below the baseline (positive).
    pub descent: f32,
    /// Recommended distance between consecutive baselines.
    pub linespace: f32,
}

/// The full measurement of a run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Advance width of the text.
    pub width: f32,
    /// Height above the baseline.
    pub ascent: f32,
    /// Depth below the baseline.
    pub descent: f32,
    /// Baseline-to-baseline distance.
    pub linespace: f32,
}

/// Font measurement collaborator.
///
/// Implementations should be pure: the same inputs always give the same
/// results, which is what makes caching line metrics sound.
pub trait FontMetrics {
    /// Advance width of `text` set in `font`.
    fn text_width(&self, text: &str, font: &FontSpec) -> f32;

    /// Vertical metrics of `font`.
    fn line_metrics(&self, font: &FontSpec) -> LineMetrics;
}

/// Approximate font metrics using fixed ratios.
///
/// The average advance of Latin glyphs in a proportional font is about
/// 0.6× the font size; ascent and descent split the em box 3:1, and the
/// line spacing is 1.2×. Deterministic, so layouts built on it are exact
/// in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateFontMetrics;

impl ApproximateFontMetrics {
    const CHAR_WIDTH_RATIO: f32 = 0.6;
    const ASCENT_RATIO: f32 = 0.75;
    const DESCENT_RATIO: f32 = 0.25;
    const LINESPACE_RATIO: f32 = 1.2;
}

impl FontMetrics for ApproximateFontMetrics {
    fn text_width(&self, text: &str, font: &FontSpec) -> f32 {
        text.chars().count() as f32 * font.size * Self::CHAR_WIDTH_RATIO
    }

    fn line_metrics(&self, font: &FontSpec) -> LineMetrics {
        LineMetrics {
            ascent: font.size * Self::ASCENT_RATIO,
            descent: font.size * Self::DESCENT_RATIO,
            linespace: font.size * Self::LINESPACE_RATIO,
        }
    }
}

/// Measurement service handed to layout and paint.
///
/// Line metrics are cached per [`FontSpec`]; entries are never evicted.
pub struct FontCache {
    metrics: Box<dyn FontMetrics>,
    lines: HashMap<FontSpec, LineMetrics>,
}

impl FontCache {
    /// Wrap a metrics implementation.
    #[must_use]
    pub fn new(metrics: Box<dyn FontMetrics>) -> Self {
        Self {
            metrics,
            lines: HashMap::new(),
        }
    }

    /// A cache over [`ApproximateFontMetrics`].
    #[must_use]
    pub fn approximate() -> Self {
        Self::new(Box::new(ApproximateFontMetrics))
    }

    /// Vertical metrics of `font`, computed once per face.
    pub fn line_metrics(&mut self, font: &FontSpec) -> LineMetrics {
        if let Some(&cached) = self.lines.get(font) {
            return cached;
        }
        let computed = self.metrics.line_metrics(font);
        let _ = self.lines.insert(*font, computed);
        computed
    }

    /// Advance width of `text` in `font`.
    pub fn text_width(&self, text: &str, font: &FontSpec) -> f32 {
        self.metrics.text_width(text, font)
    }

    /// `measure(text, size, weight, style) -> {width, ascent, descent, linespace}`
    pub fn measure(&mut self, text: &str, font: &FontSpec) -> Measurement {
        let line = self.line_metrics(font);
        Measurement {
            width: self.text_width(text, font),
            ascent: line.ascent,
            descent: line.descent,
            linespace: line.linespace,
        }
    }

    /// Number of faces with cached metrics.
    #[must_use]
    pub fn cached_faces(&self) -> usize {
        self.lines.len()
    }
}

impl Default for FontCache {
    fn default() -> Self {
        Self::approximate()
    }
}
