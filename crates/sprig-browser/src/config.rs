//! Viewport and layout settings.

use sprig_css::LayoutConfig;

/// Geometry of the browser window and page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrowserConfig {
    /// Window width in pixels.
    pub width: f32,
    /// Window height in pixels, chrome included.
    pub height: f32,
    /// Horizontal page margin.
    pub h_step: f32,
    /// Vertical page margin.
    pub v_step: f32,
    /// Distance one scroll step moves the page.
    pub scroll_step: f32,
    /// Width of `input` and `button` boxes.
    pub input_width: f32,
    /// Padding around the address bar.
    pub chrome_padding: f32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            h_step: 13.0,
            v_step: 18.0,
            scroll_step: 100.0,
            input_width: 200.0,
            chrome_padding: 5.0,
        }
    }
}

impl BrowserConfig {
    /// The part of the configuration layout needs.
    #[must_use]
    pub const fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            width: self.width,
            h_step: self.h_step,
            v_step: self.v_step,
            input_width: self.input_width,
        }
    }
}
