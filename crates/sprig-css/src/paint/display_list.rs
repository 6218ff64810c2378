//! Display List - a sequence of drawing commands
//!
//! [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! The display list is the output of the painting phase: every command
//! needed to draw the page, back to front, in page coordinates. Each
//! command knows its own bounding rectangle so a surface can skip what is
//! scrolled out of view.

use serde::Serialize;

use super::PaintSurface;
use crate::layout::FontSpec;
use crate::style::ColorValue;

/// A point in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl Point {
    /// A point at `(x, y)`.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle given by its edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl Rect {
    /// A rectangle from its four edges.
    #[must_use]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Whether `(x, y)` lies inside (left and top edges inclusive).
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.left <= x && x < self.right && self.top <= y && y < self.bottom
    }

    /// The same rectangle moved up by `dy`.
    #[must_use]
    pub fn shifted_up(&self, dy: f32) -> Self {
        Self::new(self.left, self.top - dy, self.right, self.bottom - dy)
    }
}

/// A single drawing command.
///
/// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DrawCommand {
    /// Draw text with its top-left corner at the rectangle's origin.
    Text {
        /// Area the text covers.
        rect: Rect,
        /// The text to draw.
        text: String,
        /// Face to draw it in.
        font: FontSpec,
        /// Text color.
        color: ColorValue,
    },
    /// Fill a rectangle.
    Rect {
        /// Area to fill.
        rect: Rect,
        /// Fill color.
        color: ColorValue,
    },
    /// Stroke the border of a rectangle.
    Outline {
        /// Rectangle to stroke.
        rect: Rect,
        /// Stroke color.
        color: ColorValue,
        /// Stroke width in pixels.
        thickness: f32,
    },
    /// Draw a straight line.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Stroke color.
        color: ColorValue,
        /// Stroke width in pixels.
        thickness: f32,
    },
}

impl DrawCommand {
    /// The command's bounding rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        match self {
            Self::Text { rect, .. } | Self::Rect { rect, .. } | Self::Outline { rect, .. } => *rect,
            Self::Line { from, to, .. } => Rect::new(
                from.x.min(to.x),
                from.y.min(to.y),
                from.x.max(to.x),
                from.y.max(to.y),
            ),
        }
    }

    /// Draw onto `surface` with everything moved up by `scroll`.
    pub fn execute(&self, surface: &mut dyn PaintSurface, scroll: f32) {
        match self {
            Self::Text {
                rect,
                text,
                font,
                color,
            } => surface.text(Point::new(rect.left, rect.top - scroll), text, font, *color),
            Self::Rect { rect, color } => surface.fill_rect(rect.shifted_up(scroll), *color),
            Self::Outline {
                rect,
                color,
                thickness,
            } => surface.outline(rect.shifted_up(scroll), *color, *thickness),
            Self::Line {
                from,
                to,
                color,
                thickness,
            } => surface.line(
                Point::new(from.x, from.y - scroll),
                Point::new(to.x, to.y - scroll),
                *color,
                *thickness,
            ),
        }
    }
}

/// A list of drawing commands in painting order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command to the display list.
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Get the commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Get the number of commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the display list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands that overlap the band `[scroll, scroll + height]`; anything
    /// wholly above or below it is skipped.
    pub fn visible(&self, scroll: f32, height: f32) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |command| {
            let rect = command.rect();
            rect.top <= scroll + height && rect.bottom >= scroll
        })
    }
}

impl Extend<DrawCommand> for DisplayList {
    fn extend<T: IntoIterator<Item = DrawCommand>>(&mut self, iter: T) {
        self.commands.extend(iter);
    }
}
