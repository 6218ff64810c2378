//! High-level browser API for the sprig renderer.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - fetch and parse a page, its linked stylesheets,
//!   and its scripts
//! - **Script Execution** - external and inline scripts in document order,
//!   each fault contained to its own script
//! - **Render Pass** - cascade, layout, and paint into a display list
//! - **Input** - scrolling, clicks on links, inputs and buttons, typing, and
//!   form submission
//! - **Software Rendering** - headless screenshots through fontdue
//!
//! # Not Yet Implemented
//!
//! - History (back/forward)
//! - Multiple tabs
//! - Images and other embedded resources

pub mod chrome;
pub mod config;
pub mod fonts;
pub mod renderer;
pub mod tab;

pub use sprig_css as css;
pub use sprig_dom as dom;
pub use sprig_html as html;
pub use sprig_js as js;

pub use config::BrowserConfig;
pub use fonts::{FontSet, FontdueFontMetrics, font_cache};
pub use renderer::Renderer;
pub use tab::Tab;

use sprig_common::FetchError;
use sprig_js::ScriptError;
use thiserror::Error;

/// Why a navigation failed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The address is not a usable URL.
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),
    /// The page itself could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The document's script runtime could not be created.
    #[error(transparent)]
    Script(#[from] ScriptError),
}

/// Draw `tab` into a fresh `renderer`-sized frame.
pub fn render_frame(tab: &mut Tab, renderer: &mut Renderer) {
    renderer.clear();
    tab.draw(renderer);
}
