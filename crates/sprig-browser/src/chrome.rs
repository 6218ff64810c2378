//! Browser chrome: the address bar above the page.

use sprig_css::{ColorValue, DisplayList, DrawCommand, FontCache, FontSpec, Point, Rect};

use crate::config::BrowserConfig;

/// Height of the chrome strip: one line of default text plus padding above
/// and below.
#[must_use]
pub fn chrome_height(fonts: &mut FontCache, config: &BrowserConfig) -> f32 {
    let line = fonts.line_metrics(&FontSpec::default());
    line.linespace + 2.0 * config.chrome_padding
}

/// Draw commands for the chrome, in window coordinates.
///
/// A white strip hides page content scrolled under it; the address bar is
/// an outlined box holding the current URL.
#[must_use]
pub fn paint_chrome(url: &str, fonts: &mut FontCache, config: &BrowserConfig) -> DisplayList {
    let height = chrome_height(fonts, config);
    let padding = config.chrome_padding;
    let mut list = DisplayList::new();

    list.push(DrawCommand::Rect {
        rect: Rect::new(0.0, 0.0, config.width, height),
        color: ColorValue::WHITE,
    });

    let bar = Rect::new(padding, padding / 2.0, config.width - padding, height - padding / 2.0);
    list.push(DrawCommand::Outline {
        rect: bar,
        color: ColorValue::BLACK,
        thickness: 1.0,
    });

    let font = FontSpec::default();
    let width = fonts.text_width(url, &font);
    let line = fonts.line_metrics(&font);
    let left = bar.left + padding;
    list.push(DrawCommand::Text {
        rect: Rect::new(left, padding, left + width, padding + line.linespace),
        text: url.to_string(),
        font,
        color: ColorValue::BLACK,
    });

    list.push(DrawCommand::Line {
        from: Point::new(0.0, height),
        to: Point::new(config.width, height),
        color: ColorValue::BLACK,
        thickness: 1.0,
    });

    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome_height_with_approximate_fonts() {
        let mut fonts = FontCache::approximate();
        let height = chrome_height(&mut fonts, &BrowserConfig::default());
        assert!((height - (19.2 + 10.0)).abs() < 1e-3);
    }

    #[test]
    fn test_address_bar_shows_url() {
        let mut fonts = FontCache::approximate();
        let list = paint_chrome("http://example.org/", &mut fonts, &BrowserConfig::default());
        assert!(list.commands().iter().any(|c| matches!(
            c,
            DrawCommand::Text { text, .. } if text == "http://example.org/"
        )));
        assert!(
            list.commands()
                .iter()
                .any(|c| matches!(c, DrawCommand::Outline { .. }))
        );
    }
}
