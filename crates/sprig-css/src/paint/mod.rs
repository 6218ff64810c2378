//! Painting
//!
//! [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! - [`display_list`] - draw commands and the list that holds them
//! - [`painter`] - layout tree to display list
//!
//! Actually putting pixels somewhere is the job of a [`PaintSurface`].

pub mod display_list;
pub mod painter;

pub use display_list::{DisplayList, DrawCommand, Point, Rect};
pub use painter::paint_tree;

use crate::layout::FontSpec;
use crate::style::ColorValue;

/// A target that can execute draw commands, in viewport coordinates.
pub trait PaintSurface {
    /// Fill `rect` with `color`.
    fn fill_rect(&mut self, rect: Rect, color: ColorValue);

    /// Stroke the border of `rect`.
    fn outline(&mut self, rect: Rect, color: ColorValue, thickness: f32);

    /// Draw a line from `from` to `to`.
    fn line(&mut self, from: Point, to: Point, color: ColorValue, thickness: f32);

    /// Draw `text` with its top-left corner at `origin`.
    fn text(&mut self, origin: Point, text: &str, font: &FontSpec, color: ColorValue);
}

/// Execute the commands of `list` visible in a viewport of `height` pixels
/// scrolled to `scroll`, translated into viewport coordinates.
pub fn paint_display_list(
    surface: &mut dyn PaintSurface,
    list: &DisplayList,
    scroll: f32,
    height: f32,
) {
    for command in list.visible(scroll, height) {
        command.execute(surface, scroll);
    }
}
