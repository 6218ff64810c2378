//! Computed style
//!
//! [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
//!
//! Values are kept as the strings the cascade selected; the typed readers
//! below interpret them on demand.

use std::collections::HashMap;

use serde::Serialize;
use sprig_common::warning::warn_once;

use super::color::ColorValue;
use super::font::{FontStyle, FontWeight};

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

/// [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
///
/// Inherited properties and their initial values. Every styled node carries
/// all of these; a node without an element parent takes the initial value.
pub const INHERITED_PROPERTIES: &[(&str, &str)] = &[
    ("font-size", "16px"),
    ("font-style", "normal"),
    ("font-weight", "normal"),
    ("color", "black"),
];

/// The resolved style of one node: property name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComputedStyle {
    properties: HashMap<String, String>,
}

impl ComputedStyle {
    /// An empty style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of `property`.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    /// Set `property`, replacing any earlier value.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let _ = self.properties.insert(property.into(), value.into());
    }

    /// Overwrite with every declaration in `declarations`.
    pub fn apply<'a, I>(&mut self, declarations: I)
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (property, value) in declarations {
            self.set(property.clone(), value.clone());
        }
    }

    /// Number of properties set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate over `(property, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// [§ 3.5 'font-size'](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
    ///
    /// The absolute size in pixels. After the cascade every node's size is
    /// in `px`; anything unreadable falls back to the default size.
    #[must_use]
    pub fn font_size_px(&self) -> f32 {
        self.get("font-size")
            .and_then(parse_px)
            .unwrap_or(DEFAULT_FONT_SIZE_PX)
    }

    /// The `font-weight` face.
    #[must_use]
    pub fn font_weight(&self) -> FontWeight {
        self.get("font-weight")
            .map(FontWeight::from_css)
            .unwrap_or_default()
    }

    /// The `font-style` face.
    #[must_use]
    pub fn font_style(&self) -> FontStyle {
        self.get("font-style")
            .map(FontStyle::from_css)
            .unwrap_or_default()
    }

    /// Text color; black when unset or unreadable.
    #[must_use]
    pub fn color(&self) -> ColorValue {
        self.get("color")
            .and_then(|value| read_color("color", value))
            .unwrap_or(ColorValue::BLACK)
    }

    /// Background color, or `None` when absent, `transparent`, or
    /// unreadable.
    #[must_use]
    pub fn background_color(&self) -> Option<ColorValue> {
        self.get("background-color")
            .and_then(|value| read_color("background-color", value))
            .filter(|c| !c.is_transparent())
    }

    /// The `display` keyword, `inline` when unset.
    #[must_use]
    pub fn display(&self) -> &str {
        self.get("display").unwrap_or("inline")
    }

    /// [§ 2.6 display: none](https://www.w3.org/TR/css-display-3/#valdef-display-none)
    ///
    /// "The element and its descendants generate no boxes or text runs."
    #[must_use]
    pub fn is_display_none(&self) -> bool {
        self.display() == "none"
    }
}

/// `12px` -> 12.0
#[must_use]
pub fn parse_px(value: &str) -> Option<f32> {
    value.strip_suffix("px")?.parse().ok()
}

/// `50%` -> 0.5
#[must_use]
pub fn parse_percentage(value: &str) -> Option<f32> {
    value
        .strip_suffix('%')?
        .parse::<f32>()
        .ok()
        .map(|p| p / 100.0)
}

fn read_color(property: &str, value: &str) -> Option<ColorValue> {
    let color = ColorValue::parse(value);
    if color.is_none() {
        warn_once("CSS", &format!("unsupported {property} value '{value}'"));
    }
    color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readers_fall_back_to_defaults() {
        let style = ComputedStyle::new();
        assert!((style.font_size_px() - DEFAULT_FONT_SIZE_PX).abs() < f32::EPSILON);
        assert_eq!(style.font_weight(), FontWeight::Normal);
        assert_eq!(style.font_style(), FontStyle::Normal);
        assert_eq!(style.color(), ColorValue::BLACK);
        assert_eq!(style.background_color(), None);
        assert_eq!(style.display(), "inline");
    }

    #[test]
    fn test_transparent_background_is_absent() {
        let mut style = ComputedStyle::new();
        style.set("background-color", "transparent");
        assert_eq!(style.background_color(), None);
        style.set("background-color", "red");
        assert_eq!(style.background_color(), Some(ColorValue::rgb(255, 0, 0)));
    }

    #[test]
    fn test_length_helpers() {
        assert_eq!(parse_px("12px"), Some(12.0));
        assert_eq!(parse_px("12em"), None);
        assert_eq!(parse_percentage("150%"), Some(1.5));
        assert_eq!(parse_percentage("abc%"), None);
    }
}
