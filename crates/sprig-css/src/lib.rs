//! Stylesheet parsing, cascade, layout, and painting for the sprig renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **Stylesheet parser** - a cursor-based recursive-descent parser that
//!   recovers from malformed declarations and rules by skipping to the next
//!   delimiter
//! - **Selectors** - tag and descendant selectors with additive priority
//! - **Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Inherited properties (`font-size`, `font-style`, `font-weight`, `color`)
//!   - Rules applied in stable priority order
//!   - `style` attribute overrides
//!   - Percentage font sizes
//! - **Layout** ([CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html))
//!   - Block flow and inline flow with word wrapping
//!   - Inline `input` / `button` boxes
//! - **Painting** - flattening the layout tree into draw commands
//!
//! # Not Yet Implemented
//!
//! - Combinators other than descendant, classes, IDs, pseudo-classes
//! - Comments and at-rules in stylesheets
//! - Margins, padding, borders, floats, tables, flexbox

/// Cascade and style computation per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Block and inline layout per [CSS 2.1 § 9](https://www.w3.org/TR/CSS2/visuren.html).
pub mod layout;
/// Display list and painting per [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html).
pub mod paint;
/// Stylesheet parser.
pub mod parser;
/// Tag and descendant selectors.
pub mod selector;
/// Computed style representation.
pub mod style;
/// User-agent stylesheet per [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html).
pub mod ua_stylesheet;

pub use cascade::{Styles, cascade_order, compute_styles};
pub use layout::{
    ApproximateFontMetrics, BoxKind, FontCache, FontMetrics, FontSpec, LayoutBox, LayoutConfig,
    LayoutId, LayoutTree, LineMetrics, Measurement, layout,
};
pub use paint::{DisplayList, DrawCommand, PaintSurface, Point, Rect, paint_display_list, paint_tree};
pub use parser::{
    CssParser, Declarations, ParseError, Rule, parse_declarations, parse_selector, parse_stylesheet,
};
pub use selector::Selector;
pub use style::{ColorValue, ComputedStyle, FontStyle, FontWeight};
pub use ua_stylesheet::ua_rules;
