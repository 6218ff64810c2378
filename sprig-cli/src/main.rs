//! sprig command-line interface
//!
//! Loads a page headlessly and prints what the renderer made of it:
//! the node tree, the display list, and optionally a PNG screenshot.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use sprig_browser::{BrowserConfig, FontSet, Renderer, Tab, font_cache, render_frame};
use sprig_common::HttpFetcher;
use sprig_common::link::from_user_input;
use sprig_css::{DisplayList, DrawCommand};
use sprig_dom::NodeId;
use sprig_html::format_tree;

/// sprig: a minimal document renderer
#[derive(Parser, Debug)]
#[command(name = "sprig")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the display list of a local file
    sprig ./index.html

    # Dump the node tree of a remote page
    sprig --tree http://localhost:8000/

    # Screenshot, scrolled 300px down
    sprig -S out.png --scroll 300 http://localhost:8000/

    # Display list as JSON
    sprig --json ./index.html
"#)]
struct Cli {
    /// Path to an HTML file or a URL
    #[arg(value_name = "FILE|URL")]
    target: String,

    /// Viewport width
    #[arg(long, default_value = "800")]
    width: u32,

    /// Viewport height, address bar included
    #[arg(long, default_value = "600")]
    height: u32,

    /// Scroll offset of the screenshot
    #[arg(long, default_value = "0")]
    scroll: f32,

    /// Save a screenshot to the given file (PNG)
    #[arg(short = 'S', long, value_name = "FILE")]
    screenshot: Option<PathBuf>,

    /// Print the display list as JSON
    #[arg(long)]
    json: bool,

    /// Print the node tree
    #[arg(long)]
    tree: bool,

    /// Log pipeline steps
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let url = from_user_input(&cli.target)
        .with_context(|| format!("cannot turn '{}' into a URL", cli.target))?;

    #[allow(clippy::cast_precision_loss)]
    let config = BrowserConfig {
        width: cli.width as f32,
        height: cli.height as f32,
        ..BrowserConfig::default()
    };
    let fonts = Rc::new(FontSet::load_system());
    let fetcher = HttpFetcher::new()?;
    let mut tab = Tab::new(config, Box::new(fetcher), font_cache(&fonts));
    tab.load(&url, None)
        .with_context(|| format!("failed to load {url}"))?;
    tab.set_scroll(cli.scroll);

    if cli.tree
        && let Some(dom) = tab.dom()
    {
        println!("{}", "=== Node Tree ===".bold());
        print!("{}", format_tree(&dom.borrow(), NodeId::ROOT));
        println!();
    }

    if let Some(list) = tab.display_list() {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(list)?);
        } else {
            print_display_list(list);
        }
    }

    for fault in tab.script_faults() {
        eprintln!("{} {}: {}", "script error".red(), fault.identity, fault.error);
    }

    if let Some(path) = &cli.screenshot {
        save_screenshot(&mut tab, &fonts, path, cli.width, cli.height)?;
        println!("Screenshot saved to: {}", path.display());
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise warnings, or everything with `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn print_display_list(list: &DisplayList) {
    println!("{} ({} commands)", "=== Display List ===".bold(), list.len());
    for command in list.commands() {
        let r = command.rect();
        let at = format!("[{:.1}, {:.1} → {:.1}, {:.1}]", r.left, r.top, r.right, r.bottom);
        match command {
            DrawCommand::Text { text, font, .. } => {
                println!("{:<8} {} {:?} {}px", "text".cyan(), at.dimmed(), text, font.size);
            }
            DrawCommand::Rect { color, .. } => {
                println!("{:<8} {} {color:?}", "rect".green(), at.dimmed());
            }
            DrawCommand::Outline { thickness, .. } => {
                println!("{:<8} {} {thickness}px", "outline".yellow(), at.dimmed());
            }
            DrawCommand::Line { .. } => println!("{:<8} {}", "line".magenta(), at.dimmed()),
        }
    }
}

fn save_screenshot(tab: &mut Tab, fonts: &Rc<FontSet>, path: &Path, width: u32, height: u32) -> Result<()> {
    let mut renderer = Renderer::new(width, height, Rc::clone(fonts));
    render_frame(tab, &mut renderer);
    renderer.save(path)
}
