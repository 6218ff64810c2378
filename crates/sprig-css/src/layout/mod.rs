//! Block and inline layout
//!
//! [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//!
//! # Module Structure
//!
//! - [`layout_box`] - the layout box arena and hit testing
//! - [`font`] - font measurement and the metrics cache
//!
//! # Algorithm
//!
//! Every node laid out in block flow gets a [`BoxKind::Block`]. A block
//! whose children include a block-level element stacks one child block per
//! child node; any other block flows its content into [`BoxKind::Line`]s of
//! [`BoxKind::TextRun`]s (one per word) and [`BoxKind::Input`]s, wrapping
//! when the next item would overflow the block's width.
//!
//! Geometry is computed top-down for `x`, `y`, and `width`, and bottom-up
//! for `height`: a box's `y` is its previous sibling's bottom (or its
//! parent's top), and a box's height is known only after its children are
//! laid out.

pub mod font;
pub mod layout_box;

pub use font::{ApproximateFontMetrics, FontCache, FontMetrics, FontSpec, LineMetrics, Measurement};
pub use layout_box::{BoxKind, LayoutBox, LayoutId, LayoutTree};

use sprig_dom::{DomTree, NodeId, NodeType};

use crate::cascade::Styles;
use crate::style::ComputedStyle;

/// [HTML Living Standard § 15.3.3 Flow content](https://html.spec.whatwg.org/multipage/rendering.html#flow-content-3)
///
/// Elements that force their parent into block flow.
pub const BLOCK_ELEMENTS: &[&str] = &[
    "html", "body", "article", "section", "nav", "aside", "h1", "h2", "h3", "h4", "h5", "h6",
    "hgroup", "header", "footer", "address", "p", "hr", "pre", "blockquote", "ol", "ul", "menu",
    "li", "dl", "dt", "dd", "figure", "figcaption", "main", "div", "table", "form", "fieldset",
    "legend", "details", "summary",
];

/// Line box height and baseline are this multiple of the font extents.
const LEADING: f32 = 1.25;

/// Viewport geometry layout depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Viewport width.
    pub width: f32,
    /// Horizontal page margin.
    pub h_step: f32,
    /// Vertical page margin.
    pub v_step: f32,
    /// Width of `input` and `button` boxes.
    pub input_width: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            h_step: 13.0,
            v_step: 18.0,
            input_width: 200.0,
        }
    }
}

/// How a block lays out its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Child blocks stacked vertically.
    Block,
    /// Words and controls flowed into lines.
    Inline,
}

/// Decide between block and inline flow for `node`.
///
/// Text is always inline. An element is block when any child is a
/// block-level element, inline when it has other children (or is an empty
/// `input`), and block otherwise.
#[must_use]
pub fn layout_mode(tree: &DomTree, node: NodeId) -> LayoutMode {
    let Some(element) = tree.as_element(node) else {
        return LayoutMode::Inline;
    };
    let children = tree.children(node);
    if children
        .iter()
        .any(|&c| tree.tag_name(c).is_some_and(|t| BLOCK_ELEMENTS.contains(&t)))
    {
        LayoutMode::Block
    } else if !children.is_empty() || element.is("input") {
        LayoutMode::Inline
    } else {
        LayoutMode::Block
    }
}

/// Build and lay out the box tree for a styled document.
#[must_use]
pub fn layout(
    tree: &DomTree,
    styles: &Styles,
    fonts: &mut FontCache,
    config: &LayoutConfig,
) -> LayoutTree {
    let mut engine = LayoutEngine {
        dom: tree,
        styles,
        fonts,
        config,
        boxes: LayoutTree::new(),
    };
    engine.layout_document();
    engine.boxes
}

/// Where the next inline item goes within a block.
struct InlineCursor {
    block: LayoutId,
    /// Horizontal offset from the block's left edge.
    x: f32,
}

struct LayoutEngine<'a> {
    dom: &'a DomTree,
    styles: &'a Styles,
    fonts: &'a mut FontCache,
    config: &'a LayoutConfig,
    boxes: LayoutTree,
}

impl LayoutEngine<'_> {
    fn layout_document(&mut self) {
        let root = self
            .boxes
            .push(LayoutBox::new(BoxKind::Document, None, None, None));
        let config = self.config;
        if let Some(b) = self.boxes.get_mut(root) {
            b.x = config.h_step;
            b.y = config.v_step;
            b.width = config.width - 2.0 * config.h_step;
        }

        if let Some(html) = self.dom.document_element()
            && !self.is_hidden(html)
        {
            let child = self
                .boxes
                .push(LayoutBox::new(BoxKind::Block, Some(html), Some(root), None));
            self.layout_block(child);
        }

        self.sum_child_heights(root);
    }

    fn layout_block(&mut self, id: LayoutId) {
        self.place_from_parent(id);
        let Some(node) = self.boxes.get(id).and_then(|b| b.node) else {
            return;
        };
        let dom = self.dom;

        match layout_mode(dom, node) {
            LayoutMode::Block => {
                let mut previous = None;
                for &child in dom.children(node) {
                    if self.is_hidden(child) {
                        continue;
                    }
                    previous = Some(self.boxes.push(LayoutBox::new(
                        BoxKind::Block,
                        Some(child),
                        Some(id),
                        previous,
                    )));
                }
            }
            LayoutMode::Inline => {
                let mut cursor = InlineCursor { block: id, x: 0.0 };
                self.new_line(&mut cursor);
                self.recurse(&mut cursor, node);
            }
        }

        for child in self.boxes.children(id).to_vec() {
            if matches!(self.boxes.get(child).map(|b| &b.kind), Some(BoxKind::Line)) {
                self.layout_line(child);
            } else {
                self.layout_block(child);
            }
        }

        self.sum_child_heights(id);
    }

    fn recurse(&mut self, cursor: &mut InlineCursor, node: NodeId) {
        let dom = self.dom;
        match dom.get(node).map(|n| &n.node_type) {
            Some(NodeType::Text(text)) => {
                for word in text.split_whitespace() {
                    self.word(cursor, node, word);
                }
            }
            Some(NodeType::Element(element)) => {
                if element.is("br") {
                    self.new_line(cursor);
                } else if element.is("input") || element.is("button") {
                    self.input(cursor, node);
                } else {
                    for &child in dom.children(node) {
                        if !self.is_hidden(child) {
                            self.recurse(cursor, child);
                        }
                    }
                }
            }
            Some(NodeType::Document) | None => {}
        }
    }

    fn new_line(&mut self, cursor: &mut InlineCursor) {
        cursor.x = 0.0;
        let node = self.boxes.get(cursor.block).and_then(|b| b.node);
        let previous = self.boxes.children(cursor.block).last().copied();
        let _ = self.boxes.push(LayoutBox::new(
            BoxKind::Line,
            node,
            Some(cursor.block),
            previous,
        ));
    }

    /// Start a new line if an item of `width` would overflow the current
    /// one. A line that is still empty takes the item regardless.
    fn wrap_if_needed(&mut self, cursor: &mut InlineCursor, width: f32) {
        let block_width = self.boxes.get(cursor.block).map_or(0.0, |b| b.width);
        let line_has_items = self
            .current_line(cursor)
            .is_some_and(|line| !self.boxes.children(line).is_empty());
        if line_has_items && cursor.x + width > block_width {
            self.new_line(cursor);
        }
    }

    fn current_line(&self, cursor: &InlineCursor) -> Option<LayoutId> {
        self.boxes.children(cursor.block).last().copied()
    }

    fn word(&mut self, cursor: &mut InlineCursor, node: NodeId, word: &str) {
        let font = self.font_for(node);
        let width = self.fonts.text_width(word, &font);
        self.wrap_if_needed(cursor, width);
        self.push_inline(
            cursor,
            node,
            BoxKind::TextRun {
                text: word.to_string(),
                font,
            },
        );
        cursor.x += width + self.fonts.text_width(" ", &font);
    }

    fn input(&mut self, cursor: &mut InlineCursor, node: NodeId) {
        let font = self.font_for(node);
        let width = self.config.input_width;
        self.wrap_if_needed(cursor, width);
        self.push_inline(cursor, node, BoxKind::Input { font });
        cursor.x += width + self.fonts.text_width(" ", &font);
    }

    fn push_inline(&mut self, cursor: &InlineCursor, node: NodeId, kind: BoxKind) {
        let Some(line) = self.current_line(cursor) else {
            return;
        };
        let previous = self.boxes.children(line).last().copied();
        let _ = self
            .boxes
            .push(LayoutBox::new(kind, Some(node), Some(line), previous));
    }

    /// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
    ///
    /// Items sit on a shared baseline placed `LEADING` times the tallest
    /// ascent below the line's top; the line is `LEADING` times the tallest
    /// ascent plus the deepest descent.
    fn layout_line(&mut self, id: LayoutId) {
        self.place_from_parent(id);
        let items = self.boxes.children(id).to_vec();
        if items.is_empty() {
            self.set_height(id, 0.0);
            return;
        }

        let mut metrics = Vec::with_capacity(items.len());
        for &item in &items {
            self.layout_inline_item(item);
            let font = self.boxes.get(item).and_then(LayoutBox::font).copied();
            metrics.push(self.fonts.line_metrics(&font.unwrap_or_default()));
        }

        let max_ascent = metrics.iter().map(|m| m.ascent).fold(0.0, f32::max);
        let max_descent = metrics.iter().map(|m| m.descent).fold(0.0, f32::max);
        let line_y = self.boxes.get(id).map_or(0.0, |b| b.y);
        let baseline = line_y + LEADING * max_ascent;

        for (&item, m) in items.iter().zip(&metrics) {
            if let Some(b) = self.boxes.get_mut(item) {
                b.y = baseline - m.ascent;
            }
        }
        self.set_height(id, LEADING * (max_ascent + max_descent));
    }

    /// Width, height, and `x` of a word or control; `y` is set by the line.
    fn layout_inline_item(&mut self, id: LayoutId) {
        let Some(item) = self.boxes.get(id) else {
            return;
        };
        let font = item.font().copied().unwrap_or_default();
        let width = match &item.kind {
            BoxKind::TextRun { text, .. } => self.fonts.text_width(text, &font),
            _ => self.config.input_width,
        };

        let x = match item.previous.and_then(|p| self.boxes.get(p)) {
            Some(prev) => {
                let prev_font = prev.font().copied().unwrap_or_default();
                prev.x + prev.width + self.fonts.text_width(" ", &prev_font)
            }
            None => item
                .parent
                .and_then(|p| self.boxes.get(p))
                .map_or(0.0, |p| p.x),
        };
        let height = self.fonts.line_metrics(&font).linespace;

        if let Some(b) = self.boxes.get_mut(id) {
            b.x = x;
            b.width = width;
            b.height = height;
        }
    }

    /// `x` and `width` from the parent; `y` below the previous sibling, or
    /// at the parent's top.
    fn place_from_parent(&mut self, id: LayoutId) {
        let Some(b) = self.boxes.get(id) else { return };
        let (x, width, parent_y) = b
            .parent
            .and_then(|p| self.boxes.get(p))
            .map_or((0.0, 0.0, 0.0), |p| (p.x, p.width, p.y));
        let y = b
            .previous
            .and_then(|p| self.boxes.get(p))
            .map_or(parent_y, |prev| prev.y + prev.height);

        if let Some(b) = self.boxes.get_mut(id) {
            b.x = x;
            b.y = y;
            b.width = width;
        }
    }

    fn sum_child_heights(&mut self, id: LayoutId) {
        let height = self
            .boxes
            .children(id)
            .iter()
            .filter_map(|&c| self.boxes.get(c))
            .map(|c| c.height)
            .sum();
        self.set_height(id, height);
    }

    fn set_height(&mut self, id: LayoutId, height: f32) {
        if let Some(b) = self.boxes.get_mut(id) {
            b.height = height;
        }
    }

    fn is_hidden(&self, node: NodeId) -> bool {
        self.styles
            .get(&node)
            .is_some_and(ComputedStyle::is_display_none)
    }

    fn font_for(&self, node: NodeId) -> FontSpec {
        self.styles
            .get(&node)
            .map(FontSpec::from_style)
            .unwrap_or_default()
    }
}
