//! Computed style representation and value parsing
//!
//! - [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/)
//! - [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)
//! - [CSS Fonts Level 4](https://www.w3.org/TR/css-fonts-4/)

mod color;
pub mod computed;
mod font;

pub use color::ColorValue;
pub use computed::{
    ComputedStyle, DEFAULT_FONT_SIZE_PX, INHERITED_PROPERTIES, parse_percentage, parse_px,
};
pub use font::{FontStyle, FontWeight};
