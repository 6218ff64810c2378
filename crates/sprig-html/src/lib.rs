//! Markup tree builder for the sprig renderer.
//!
//! # Scope
//!
//! - **Scanner** - a single pass over the input that splits it into text
//!   runs and raw tag contents on `<` / `>`
//! - **Tree builder** - a stack of unfinished elements with implicit
//!   `html` / `head` / `body` insertion, so every document comes out with a
//!   well-formed skeleton no matter how broken the input is
//!
//! # Not Yet Implemented
//!
//! - Character references (`&amp;` and friends)
//! - Comments containing `>`, CDATA, foreign content
//! - Quoted attribute values containing whitespace

/// Tree construction from raw markup.
pub mod parser;

pub use parser::{HEAD_TAGS, HtmlParser, SELF_CLOSING_TAGS, format_tree, parse, split_tag};
