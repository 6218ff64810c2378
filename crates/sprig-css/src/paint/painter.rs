//! Painter - generates a display list from a layout tree
//!
//! [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
//!
//! The painter walks the layout tree in pre-order, so a box's own commands
//! come before its children's and later content paints over earlier.

use sprig_common::warning::warn_once;
use sprig_dom::{DomTree, NodeId};

use super::{DisplayList, DrawCommand, Point, Rect};
use crate::cascade::Styles;
use crate::layout::{BoxKind, FontCache, FontSpec, LayoutBox, LayoutTree};
use crate::style::{ColorValue, ComputedStyle};

/// Flatten a laid-out tree into draw commands.
///
/// The document and line boxes draw nothing. Blocks draw their background,
/// words draw themselves, and `input`/`button` boxes draw a background,
/// their text, and a caret when focused.
#[must_use]
pub fn paint_tree(
    layout: &LayoutTree,
    dom: &DomTree,
    styles: &Styles,
    fonts: &mut FontCache,
) -> DisplayList {
    let painter = Painter { dom, styles };
    let mut display_list = DisplayList::new();
    for (_, layout_box) in layout.iter() {
        painter.paint_box(layout_box, fonts, &mut display_list);
    }
    display_list
}

struct Painter<'a> {
    dom: &'a DomTree,
    styles: &'a Styles,
}

impl Painter<'_> {
    fn style(&self, node: Option<NodeId>) -> Option<&ComputedStyle> {
        node.and_then(|n| self.styles.get(&n))
    }

    fn paint_box(&self, layout_box: &LayoutBox, fonts: &mut FontCache, out: &mut DisplayList) {
        match &layout_box.kind {
            BoxKind::Document | BoxKind::Line => {}
            BoxKind::Block => {
                if self.should_paint(layout_box) {
                    self.paint_background(layout_box, out);
                }
            }
            BoxKind::TextRun { text, font } => {
                let color = self
                    .style(layout_box.node)
                    .map_or(ColorValue::BLACK, ComputedStyle::color);
                out.push(DrawCommand::Text {
                    rect: layout_box.rect(),
                    text: text.clone(),
                    font: *font,
                    color,
                });
            }
            BoxKind::Input { font } => self.paint_input(layout_box, font, fonts, out),
        }
    }

    /// A block wrapping an `input` or `button` leaves the background to the
    /// control's own box.
    fn should_paint(&self, layout_box: &LayoutBox) -> bool {
        layout_box.node.is_none_or(|node| {
            !self
                .dom
                .tag_name(node)
                .is_some_and(|tag| tag == "input" || tag == "button")
        })
    }

    fn paint_background(&self, layout_box: &LayoutBox, out: &mut DisplayList) {
        if let Some(color) = self
            .style(layout_box.node)
            .and_then(ComputedStyle::background_color)
        {
            out.push(DrawCommand::Rect {
                rect: layout_box.rect(),
                color,
            });
        }
    }

    fn paint_input(
        &self,
        layout_box: &LayoutBox,
        font: &FontSpec,
        fonts: &mut FontCache,
        out: &mut DisplayList,
    ) {
        self.paint_background(layout_box, out);

        let Some(node) = layout_box.node else { return };
        let text = self.control_text(node);
        let color = self
            .style(Some(node))
            .map_or(ColorValue::BLACK, ComputedStyle::color);
        let measured = fonts.measure(&text, font);

        if !text.is_empty() {
            out.push(DrawCommand::Text {
                rect: Rect::new(
                    layout_box.x,
                    layout_box.y,
                    layout_box.x + measured.width,
                    layout_box.y + measured.linespace,
                ),
                text,
                font: *font,
                color,
            });
        }

        if self.dom.as_element(node).is_some_and(|e| e.focused) {
            let caret_x = layout_box.x + measured.width;
            out.push(DrawCommand::Line {
                from: Point::new(caret_x, layout_box.y),
                to: Point::new(caret_x, layout_box.y + layout_box.height),
                color: ColorValue::BLACK,
                thickness: 1.0,
            });
        }
    }

    /// An `input` shows its `value`; a `button` shows its text, provided
    /// that is all it contains.
    fn control_text(&self, node: NodeId) -> String {
        let Some(element) = self.dom.as_element(node) else {
            return String::new();
        };
        if element.is("input") {
            return element.attribute("value").unwrap_or_default().to_string();
        }

        if let [only] = self.dom.children(node)
            && let Some(text) = self.dom.as_text(*only)
        {
            return text.to_string();
        }
        warn_once("Paint", "ignoring HTML contents inside button");
        String::new()
    }
}
