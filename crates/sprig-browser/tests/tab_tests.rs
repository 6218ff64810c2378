//! Integration tests for the tab pipeline.
//!
//! Pages are served from memory and measured with `ApproximateFontMetrics`,
//! so with default settings the chrome is 19.2 + 2 * 5 = 29.2px tall and a
//! line of default text is 20px.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::rc::Rc;

use sprig_browser::css::{ColorValue, DrawCommand, FontCache, FontSpec, PaintSurface, Point, Rect};
use sprig_browser::{BrowserConfig, LoadError, Tab};
use sprig_common::{FetchError, Fetcher};
use sprig_js::ScriptError;
use url::Url;

const CHROME: f32 = 29.2;
const EPSILON: f32 = 1e-3;

type Requests = Rc<RefCell<Vec<(String, Option<String>)>>>;

/// Serves fixed bodies and records every request; unknown URLs fail as
/// if the file were missing.
struct MemoryFetcher {
    pages: HashMap<String, String>,
    requests: Requests,
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, url: &Url, payload: Option<&str>) -> Result<String, FetchError> {
        self.requests
            .borrow_mut()
            .push((url.to_string(), payload.map(str::to_string)));
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Io {
                path: url.to_string(),
                source: io::Error::from(io::ErrorKind::NotFound),
            })
    }
}

fn tab_with(pages: &[(&str, &str)]) -> (Tab, Requests) {
    let requests = Requests::default();
    let fetcher = MemoryFetcher {
        pages: pages
            .iter()
            .map(|(url, body)| ((*url).to_string(), (*body).to_string()))
            .collect(),
        requests: Rc::clone(&requests),
    };
    let tab = Tab::new(
        BrowserConfig::default(),
        Box::new(fetcher),
        FontCache::approximate(),
    );
    (tab, requests)
}

fn open(pages: &[(&str, &str)]) -> (Tab, Requests) {
    let (mut tab, requests) = tab_with(pages);
    tab.load_str("http://test/").unwrap();
    (tab, requests)
}

fn texts(tab: &Tab) -> Vec<String> {
    tab.display_list()
        .unwrap()
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn text_color(tab: &Tab, word: &str) -> Option<ColorValue> {
    tab.display_list()?.commands().iter().find_map(|c| match c {
        DrawCommand::Text { text, color, .. } if text == word => Some(*color),
        _ => None,
    })
}

#[test]
fn test_load_renders_page() {
    let (tab, requests) = open(&[("http://test/", "<p>hello world</p>")]);
    assert_eq!(texts(&tab), vec!["hello", "world"]);
    assert_eq!(tab.url().unwrap().as_str(), "http://test/");
    assert_eq!(requests.borrow().len(), 1);
}

#[test]
fn test_primary_fetch_failure_is_an_error() {
    let (mut tab, _) = tab_with(&[]);
    let result = tab.load_str("http://test/missing");
    assert!(matches!(result, Err(LoadError::Fetch(FetchError::Io { .. }))));
    assert!(tab.url().is_none());
}

#[test]
fn test_invalid_address() {
    let (mut tab, _) = tab_with(&[]);
    assert!(matches!(tab.load_str("not a url"), Err(LoadError::InvalidUrl(_))));
}

#[test]
fn test_linked_and_inline_stylesheets_apply_in_order() {
    let (tab, requests) = open(&[
        (
            "http://test/",
            "<link rel=stylesheet href=/site.css><style>b { color: green; }</style>\
             <p>a <b>b</b> <i>c</i></p>",
        ),
        ("http://test/site.css", "p { color: red; } b { color: blue; }"),
    ]);
    assert_eq!(text_color(&tab, "a"), Some(ColorValue::rgb(255, 0, 0)));
    assert_eq!(text_color(&tab, "b"), Some(ColorValue::rgb(0, 128, 0)));
    assert_eq!(text_color(&tab, "c"), Some(ColorValue::rgb(255, 0, 0)));
    assert!(requests.borrow().iter().any(|(u, _)| u == "http://test/site.css"));
}

#[test]
fn test_missing_stylesheet_is_skipped() {
    let (tab, _) = open(&[(
        "http://test/",
        "<link rel=stylesheet href=gone.css><p>still here</p>",
    )]);
    assert_eq!(texts(&tab), vec!["still", "here"]);
}

#[test]
fn test_scripts_run_in_document_order() {
    let (tab, _) = open(&[
        (
            "http://test/",
            "<script>console.log('one')</script><script src=two.js></script>\
             <p>x</p><script>console.log('three')</script>",
        ),
        ("http://test/two.js", "console.log('two')"),
    ]);
    assert_eq!(tab.console(), vec!["one", "two", "three"]);
}

#[test]
fn test_script_fault_does_not_stop_later_scripts_or_rendering() {
    let (tab, _) = open(&[
        (
            "http://test/",
            "<script src=bad.js></script><script>console.log('ran')</script><p>page</p>",
        ),
        ("http://test/bad.js", "throw new Error('boom')"),
    ]);
    assert_eq!(tab.console(), vec!["ran"]);
    assert_eq!(texts(&tab), vec!["page"]);

    let faults = tab.script_faults();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].identity, "http://test/bad.js");
    assert!(matches!(faults[0].error, ScriptError::Fault { .. }));
}

#[test]
fn test_script_mutation_is_rendered() {
    let (tab, _) = open(&[(
        "http://test/",
        "<p><input name=q value=old></p>\
         <script>document.querySelectorAll('input')[0].setAttribute('value', 'new')</script>",
    )]);
    assert_eq!(texts(&tab), vec!["new"]);
}

#[test]
fn test_run_script_rerenders_after_mutation() {
    let (mut tab, _) = open(&[("http://test/", "<a href=x>link</a>")]);
    assert_eq!(text_color(&tab, "link"), Some(ColorValue::rgb(0, 0, 255)));
    assert!(tab.run_script(
        "console",
        "document.querySelectorAll('a')[0].setAttribute('style', 'color:red')",
    ));
    assert_eq!(text_color(&tab, "link"), Some(ColorValue::rgb(255, 0, 0)));
}

#[test]
fn test_scroll_clamps_to_page_end() {
    let long_page = "<p>x</p>".repeat(60);
    let (mut tab, _) = open(&[("http://test/", long_page.as_str())]);
    // 60 lines of 20px, plus margins, minus the viewport under the chrome.
    let max = 1200.0 + 36.0 - (600.0 - CHROME);

    tab.scroll_down();
    assert!((tab.scroll() - 100.0).abs() < EPSILON);
    for _ in 0..10 {
        tab.scroll_down();
    }
    assert!((tab.scroll() - max).abs() < EPSILON);
}

#[test]
fn test_short_page_does_not_scroll() {
    let (mut tab, _) = open(&[("http://test/", "<p>short</p>")]);
    tab.scroll_down();
    assert!(tab.scroll().abs() < EPSILON);
}

#[test]
fn test_click_link_navigates() {
    let (mut tab, requests) = open(&[
        ("http://test/", "<a href=/next>go</a>"),
        ("http://test/next", "<p>arrived</p>"),
    ]);
    // "go" sits at x 13..32.2, y 21..40.2 in page coordinates.
    tab.click(15.0, CHROME + 25.0).unwrap();
    assert_eq!(tab.url().unwrap().as_str(), "http://test/next");
    assert_eq!(texts(&tab), vec!["arrived"]);
    assert_eq!(requests.borrow().last().unwrap().1, None);
}

#[test]
fn test_click_in_chrome_is_ignored() {
    let (mut tab, _) = open(&[("http://test/", "<a href=/next>go</a>")]);
    tab.click(15.0, 10.0).unwrap();
    assert_eq!(tab.url().unwrap().as_str(), "http://test/");
}

const FORM: &str = "<form action=/submit><input name=q value=old><button>Go</button></form>";

#[test]
fn test_focus_typing_and_submit() {
    let (mut tab, requests) = open(&[
        ("http://test/", FORM),
        ("http://test/submit", "<p>thanks</p>"),
    ]);

    // The input box spans x 13..213 on the first line.
    tab.click(20.0, CHROME + 25.0).unwrap();
    let input = tab.focus().unwrap();
    {
        let dom = tab.dom().unwrap();
        let dom = dom.borrow();
        assert_eq!(dom.attribute(input, "value"), Some(""));
        assert!(dom.as_element(input).unwrap().focused);
    }
    assert!(
        tab.display_list()
            .unwrap()
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::Line { .. }))
    );

    tab.keypress('a');
    tab.keypress(' ');
    tab.keypress('&');
    assert!(texts(&tab).contains(&"a &".to_string()));

    // The button follows the input and one space: x 222.6..422.6.
    tab.click(230.0, CHROME + 25.0).unwrap();
    assert_eq!(tab.url().unwrap().as_str(), "http://test/submit");
    let last = requests.borrow().last().cloned().unwrap();
    assert_eq!(last, ("http://test/submit".to_string(), Some("q=a+%26".to_string())));
    assert_eq!(tab.focus(), None);
}

#[test]
fn test_click_elsewhere_drops_focus() {
    let (mut tab, _) = open(&[("http://test/", FORM)]);
    tab.click(20.0, CHROME + 25.0).unwrap();
    assert!(tab.focus().is_some());

    tab.click(700.0, CHROME + 300.0).unwrap();
    assert_eq!(tab.focus(), None);
    tab.keypress('x');
    assert!(!texts(&tab).contains(&"x".to_string()));
}

#[test]
fn test_keypress_without_focus_is_ignored() {
    let (mut tab, _) = open(&[("http://test/", FORM)]);
    tab.keypress('z');
    assert_eq!(texts(&tab), vec!["old", "Go"]);
}

#[test]
fn test_navigation_discards_script_state() {
    let (mut tab, _) = open(&[
        ("http://test/", "<script>console.log('first')</script><a href=/b>b</a>"),
        ("http://test/b", "<script>console.log(typeof leftover)</script><p>b</p>"),
    ]);
    assert!(tab.run_script("console", "var leftover = 1;"));
    tab.load_str("http://test/b").unwrap();
    assert_eq!(tab.console(), vec!["undefined"]);
}

/// Records text draws with their window position.
#[derive(Default)]
struct TextRecorder {
    texts: Vec<(String, f32)>,
}

impl PaintSurface for TextRecorder {
    fn fill_rect(&mut self, _rect: Rect, _color: ColorValue) {}

    fn outline(&mut self, _rect: Rect, _color: ColorValue, _thickness: f32) {}

    fn line(&mut self, _from: Point, _to: Point, _color: ColorValue, _thickness: f32) {}

    fn text(&mut self, origin: Point, text: &str, _font: &FontSpec, _color: ColorValue) {
        self.texts.push((text.to_string(), origin.y));
    }
}

#[test]
fn test_draw_places_page_below_chrome() {
    let (mut tab, _) = open(&[("http://test/", "<p>x</p>")]);
    let mut surface = TextRecorder::default();
    tab.draw(&mut surface);

    let page = surface.texts.iter().find(|(t, _)| t == "x").unwrap();
    assert!((page.1 - (21.0 + CHROME)).abs() < EPSILON);
    let url = surface.texts.iter().find(|(t, _)| t == "http://test/").unwrap();
    assert!((url.1 - 5.0).abs() < EPSILON);
}
