//! Layout box arena
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! The layout tree parallels the node tree but is its own arena: boxes
//! refer to their parent, previous sibling, and children by [`LayoutId`],
//! so the parent and previous-sibling links are plain indices rather than
//! references. The tree is rebuilt from scratch on every render pass.

use sprig_dom::NodeId;

use super::font::FontSpec;
use crate::paint::Rect;

/// Index of a box in a [`LayoutTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutId(pub usize);

/// The five kinds of layout box.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxKind {
    /// The viewport-wide root. Has no node.
    Document,
    /// One box per node laid out in block flow; contains either blocks or
    /// lines.
    Block,
    /// One line of inline content inside a block.
    Line,
    /// A single word.
    TextRun {
        /// The word, without surrounding whitespace.
        text: String,
        /// Face the word is set in.
        font: FontSpec,
    },
    /// A fixed-width `input` or `button` placed inline with text.
    Input {
        /// Face the control's text is set in.
        font: FontSpec,
    },
}

/// A box and its resolved geometry.
///
/// Geometry is filled in by layout in a fixed order: `x` and `width` from
/// the parent, then `y` from the previous sibling (or the parent), and
/// `height` only after the children are done. Before that it reads zero.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    /// What kind of box this is.
    pub kind: BoxKind,
    /// Node this box was generated for. Lines carry their block's node.
    pub node: Option<NodeId>,
    /// Containing box; `None` only for the document box.
    pub parent: Option<LayoutId>,
    /// Previous box at the same level, if any.
    pub previous: Option<LayoutId>,
    /// Children in flow order.
    pub children: Vec<LayoutId>,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl LayoutBox {
    /// A box with no geometry yet.
    #[must_use]
    pub const fn new(
        kind: BoxKind,
        node: Option<NodeId>,
        parent: Option<LayoutId>,
        previous: Option<LayoutId>,
    ) -> Self {
        Self {
            kind,
            node,
            parent,
            previous,
            children: Vec::new(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }

    /// The border box as a rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Whether `(x, y)` falls inside the box (left and top edges inclusive).
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.x <= x && x < self.x + self.width && self.y <= y && y < self.y + self.height
    }

    /// Face of a text run or input box.
    #[must_use]
    pub const fn font(&self) -> Option<&FontSpec> {
        match &self.kind {
            BoxKind::TextRun { font, .. } | BoxKind::Input { font } => Some(font),
            _ => None,
        }
    }
}

/// Arena of layout boxes. Index 0 is the document box once layout has run.
#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
    boxes: Vec<LayoutBox>,
}

impl LayoutTree {
    /// The document box.
    pub const ROOT: LayoutId = LayoutId(0);

    /// An empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self { boxes: Vec::new() }
    }

    /// Add a box, appending it to its parent's children.
    pub fn push(&mut self, layout_box: LayoutBox) -> LayoutId {
        let id = LayoutId(self.boxes.len());
        if let Some(parent) = layout_box.parent {
            self.boxes[parent.0].children.push(id);
        }
        self.boxes.push(layout_box);
        id
    }

    /// Get a box by id.
    #[must_use]
    pub fn get(&self, id: LayoutId) -> Option<&LayoutBox> {
        self.boxes.get(id.0)
    }

    /// Get a mutable box by id.
    pub fn get_mut(&mut self, id: LayoutId) -> Option<&mut LayoutBox> {
        self.boxes.get_mut(id.0)
    }

    /// Number of boxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Whether layout produced nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Children of a box in flow order.
    #[must_use]
    pub fn children(&self, id: LayoutId) -> &[LayoutId] {
        self.get(id).map_or(&[], |b| b.children.as_slice())
    }

    /// Every box in pre-order (parent before children).
    pub fn iter(&self) -> impl Iterator<Item = (LayoutId, &LayoutBox)> {
        let mut stack = if self.boxes.is_empty() {
            Vec::new()
        } else {
            vec![Self::ROOT]
        };
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            let layout_box = &self.boxes[id.0];
            stack.extend(layout_box.children.iter().rev().copied());
            Some((id, layout_box))
        })
    }

    /// Height of the document box.
    #[must_use]
    pub fn document_height(&self) -> f32 {
        self.get(Self::ROOT).map_or(0.0, |b| b.height)
    }

    /// The node of the last box in pre-order that contains the point,
    /// which is the deepest (and topmost-painted) one.
    #[must_use]
    pub fn hit_test(&self, x: f32, y: f32) -> Option<NodeId> {
        self.iter()
            .filter(|(_, b)| b.node.is_some() && b.contains(x, y))
            .last()
            .and_then(|(_, b)| b.node)
    }
}
