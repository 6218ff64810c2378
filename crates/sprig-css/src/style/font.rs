//! Font keywords.

use serde::Serialize;
use strum_macros::{Display, EnumString};

/// [§ 3.2 'font-weight'](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
///
/// Only two faces are distinguished. Numeric weights of 600 and above read
/// as bold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    #[strum(to_string = "normal", serialize = "lighter")]
    Normal,
    /// Bold weight.
    #[strum(to_string = "bold", serialize = "bolder")]
    Bold,
}

impl FontWeight {
    /// Read a `font-weight` value. Unknown values fall back to normal.
    #[must_use]
    pub fn from_css(value: &str) -> Self {
        if let Ok(weight) = value.parse::<Self>() {
            return weight;
        }
        match value.parse::<u16>() {
            Ok(n) if n >= 600 => Self::Bold,
            _ => Self::Normal,
        }
    }
}

/// [§ 3.3 'font-style'](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright.
    #[default]
    #[strum(to_string = "normal", serialize = "roman")]
    Normal,
    /// Slanted; `oblique` is drawn the same way.
    #[strum(to_string = "italic", serialize = "oblique")]
    Italic,
}

impl FontStyle {
    /// Read a `font-style` value. Unknown values fall back to normal.
    #[must_use]
    pub fn from_css(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}
