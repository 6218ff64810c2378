//! One browsing context: a loaded document and the render pipeline over it.
//!
//! ```text
//! fetch → parse → stylesheets → scripts → cascade → layout → paint
//! ```
//!
//! Every mutation (script attribute writes, focus changes, typing) is
//! followed by a full cascade + layout + paint pass; nothing is incremental.

use std::cell::RefCell;
use std::rc::Rc;

use sprig_common::link::{encode_form, resolve};
use sprig_common::warning::clear_warnings;
use sprig_common::Fetcher;
use sprig_css::{
    DisplayList, FontCache, LayoutTree, PaintSurface, Rule, Styles, compute_styles, layout,
    paint_display_list, paint_tree, parse_stylesheet, ua_rules,
};
use sprig_dom::{DomTree, NodeId};
use sprig_js::{DomHandle, JsRuntime, ScriptFault};
use url::Url;

use crate::LoadError;
use crate::chrome::{chrome_height, paint_chrome};
use crate::config::BrowserConfig;

/// A loaded page and everything derived from it.
struct Document {
    url: Url,
    dom: DomHandle,
    rules: Vec<Rule>,
    runtime: JsRuntime,
    styles: Styles,
    layout: LayoutTree,
    display_list: DisplayList,
    focus: Option<NodeId>,
}

/// A browser tab.
pub struct Tab {
    config: BrowserConfig,
    fetcher: Box<dyn Fetcher>,
    fonts: FontCache,
    document: Option<Document>,
    scroll: f32,
}

impl Tab {
    /// Create an empty tab.
    #[must_use]
    pub fn new(config: BrowserConfig, fetcher: Box<dyn Fetcher>, fonts: FontCache) -> Self {
        Self {
            config,
            fetcher,
            fonts,
            document: None,
            scroll: 0.0,
        }
    }

    /// Navigate to `url`, sending `payload` as a form body when present.
    ///
    /// The previous document, its script runtime and handle table, focus,
    /// and scroll position are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Fetch`] if the page itself cannot be fetched and
    /// [`LoadError::Script`] if the script runtime cannot be created.
    /// Failures fetching stylesheets or scripts are logged and skipped.
    pub fn load(&mut self, url: &Url, payload: Option<&str>) -> Result<(), LoadError> {
        log::debug!("loading {url}");
        clear_warnings();
        let body = self.fetcher.fetch(url, payload)?;

        let dom: DomHandle = Rc::new(RefCell::new(sprig_html::parse(&body)));
        let mut rules = ua_rules().to_vec();
        rules.extend(self.document_stylesheets(&dom.borrow(), url));

        let mut runtime = JsRuntime::new(Rc::clone(&dom))?;
        let scripts = self.document_scripts(&dom.borrow(), url);
        for (identity, source) in scripts {
            let _ = runtime.run_script(&identity, &source);
        }
        let _ = runtime.take_dirty();

        self.document = Some(Document {
            url: url.clone(),
            dom,
            rules,
            runtime,
            styles: Styles::new(),
            layout: LayoutTree::new(),
            display_list: DisplayList::new(),
            focus: None,
        });
        self.scroll = 0.0;
        self.render();
        Ok(())
    }

    /// Parse `text` into a URL and load it.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidUrl`] for text that is not an absolute
    /// URL, otherwise as [`Self::load`].
    pub fn load_str(&mut self, text: &str) -> Result<(), LoadError> {
        let url = resolve(text, None).ok_or_else(|| LoadError::InvalidUrl(text.to_string()))?;
        self.load(&url, None)
    }

    /// Rules from `<link rel=stylesheet>` and `<style>`, in document order.
    fn document_stylesheets(&self, dom: &DomTree, base: &Url) -> Vec<Rule> {
        let mut rules = Vec::new();
        for node in dom.iter_all() {
            match dom.tag_name(node) {
                Some("link") if is_stylesheet_link(dom, node) => {
                    let Some(href) = dom.attribute(node, "href") else {
                        continue;
                    };
                    let Some(url) = resolve(href, Some(base)) else {
                        log::warn!("skipping stylesheet with bad href {href:?}");
                        continue;
                    };
                    match self.fetcher.fetch(&url, None) {
                        Ok(text) => rules.extend(parse_stylesheet(&text)),
                        Err(e) => log::warn!("skipping stylesheet {url}: {e}"),
                    }
                }
                Some("style") => rules.extend(parse_stylesheet(&dom.text_content(node))),
                _ => {}
            }
        }
        rules
    }

    /// `(identity, source)` for every script, in document order.
    fn document_scripts(&self, dom: &DomTree, base: &Url) -> Vec<(String, String)> {
        let mut scripts = Vec::new();
        let mut inline = 0;
        for node in dom.iter_all() {
            if dom.tag_name(node) != Some("script") {
                continue;
            }
            if let Some(src) = dom.attribute(node, "src") {
                let Some(url) = resolve(src, Some(base)) else {
                    log::warn!("skipping script with bad src {src:?}");
                    continue;
                };
                match self.fetcher.fetch(&url, None) {
                    Ok(source) => scripts.push((url.to_string(), source)),
                    Err(e) => log::warn!("skipping script {url}: {e}"),
                }
            } else {
                inline += 1;
                scripts.push((format!("inline script #{inline}"), dom.text_content(node)));
            }
        }
        scripts
    }

    /// Run cascade, layout, and paint over the current document.
    pub fn render(&mut self) {
        let Some(doc) = self.document.as_mut() else {
            return;
        };
        let dom = doc.dom.borrow();
        doc.styles = compute_styles(&dom, &doc.rules);
        doc.layout = layout(&dom, &doc.styles, &mut self.fonts, &self.config.layout_config());
        doc.display_list = paint_tree(&doc.layout, &dom, &doc.styles, &mut self.fonts);
        log::debug!(
            "rendered {} boxes into {} commands",
            doc.layout.len(),
            doc.display_list.len()
        );
    }

    /// Draw the visible part of the page and the chrome onto `surface`.
    pub fn draw(&mut self, surface: &mut dyn PaintSurface) {
        let chrome = chrome_height(&mut self.fonts, &self.config);
        if let Some(doc) = &self.document {
            paint_display_list(
                surface,
                &doc.display_list,
                self.scroll - chrome,
                self.config.height,
            );
        }
        let url = self.url().map(Url::to_string).unwrap_or_default();
        let chrome_list = paint_chrome(&url, &mut self.fonts, &self.config);
        paint_display_list(surface, &chrome_list, 0.0, self.config.height);
    }

    /// Scroll down one step, stopping where the end of the page is visible.
    pub fn scroll_down(&mut self) {
        let max = self.max_scroll();
        self.scroll = (self.scroll + self.config.scroll_step).min(max);
    }

    fn max_scroll(&mut self) -> f32 {
        let viewport = self.config.height - chrome_height(&mut self.fonts, &self.config);
        let height = self
            .document
            .as_ref()
            .map_or(0.0, |d| d.layout.document_height());
        (height + 2.0 * self.config.v_step - viewport).max(0.0)
    }

    /// Handle a click at window coordinates.
    ///
    /// Links navigate, inputs take focus (clearing their value), buttons
    /// submit their form, and clicks elsewhere drop focus.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the click navigates and the load fails.
    pub fn click(&mut self, x: f32, y: f32) -> Result<(), LoadError> {
        let chrome = chrome_height(&mut self.fonts, &self.config);
        if y < chrome {
            return Ok(());
        }
        let Some(doc) = self.document.as_mut() else {
            return Ok(());
        };
        let page_y = y - chrome + self.scroll;
        let hit = doc.layout.hit_test(x, page_y);
        log::debug!("click at ({x}, {page_y}) hit {hit:?}");

        let action = hit.and_then(|node| click_action(&doc.dom.borrow(), node, &doc.url));
        match action {
            Some(ClickAction::Navigate(url)) => return self.load(&url, None),
            Some(ClickAction::Focus(input)) => {
                doc.set_focus(Some(input));
                let _ = doc.dom.borrow_mut().set_attribute(input, "value", "");
            }
            Some(ClickAction::Submit(form)) => return self.submit_form(form),
            None => doc.set_focus(None),
        }
        self.render();
        Ok(())
    }

    /// Type `ch` into the focused input, if any.
    pub fn keypress(&mut self, ch: char) {
        let Some(doc) = self.document.as_mut() else {
            return;
        };
        let Some(input) = doc.focus else {
            return;
        };
        let mut value = doc
            .dom
            .borrow()
            .attribute(input, "value")
            .unwrap_or_default()
            .to_string();
        value.push(ch);
        let _ = doc.dom.borrow_mut().set_attribute(input, "value", &value);
        self.render();
    }

    /// Submit `form`: encode its named inputs and load its action.
    ///
    /// [§ 4.10.21.3 Form submission algorithm](https://html.spec.whatwg.org/multipage/form-control-infrastructure.html#form-submission-algorithm)
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the action URL is invalid or cannot be
    /// loaded.
    pub fn submit_form(&mut self, form: NodeId) -> Result<(), LoadError> {
        let Some(doc) = self.document.as_ref() else {
            return Ok(());
        };
        let (target, body) = {
            let dom = doc.dom.borrow();
            let fields: Vec<(&str, &str)> = dom
                .descendants(form)
                .filter(|&n| dom.tag_name(n) == Some("input"))
                .filter_map(|n| {
                    let name = dom.attribute(n, "name")?;
                    Some((name, dom.attribute(n, "value").unwrap_or_default()))
                })
                .collect();
            let action = dom.attribute(form, "action").unwrap_or_default();
            let target = resolve(action, Some(&doc.url))
                .ok_or_else(|| LoadError::InvalidUrl(action.to_string()))?;
            (target, encode_form(fields))
        };
        log::debug!("submitting form to {target}");
        self.load(&target, Some(&body))
    }

    /// The current document's URL.
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        self.document.as_ref().map(|d| &d.url)
    }

    /// The current document tree.
    #[must_use]
    pub fn dom(&self) -> Option<DomHandle> {
        self.document.as_ref().map(|d| Rc::clone(&d.dom))
    }

    /// Draw commands from the last render pass, in page coordinates.
    #[must_use]
    pub fn display_list(&self) -> Option<&DisplayList> {
        self.document.as_ref().map(|d| &d.display_list)
    }

    /// Layout tree from the last render pass.
    #[must_use]
    pub fn layout_tree(&self) -> Option<&LayoutTree> {
        self.document.as_ref().map(|d| &d.layout)
    }

    /// Resolved styles from the last render pass.
    #[must_use]
    pub fn styles(&self) -> Option<&Styles> {
        self.document.as_ref().map(|d| &d.styles)
    }

    /// The focused input, if any.
    #[must_use]
    pub fn focus(&self) -> Option<NodeId> {
        self.document.as_ref().and_then(|d| d.focus)
    }

    /// Current scroll offset.
    #[must_use]
    pub const fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Set the scroll offset, clamped to the scrollable range.
    pub fn set_scroll(&mut self, scroll: f32) {
        let max = self.max_scroll();
        self.scroll = scroll.clamp(0.0, max);
    }

    /// Console output of the current document's scripts.
    #[must_use]
    pub fn console(&self) -> Vec<String> {
        self.document
            .as_ref()
            .map(|d| d.runtime.console())
            .unwrap_or_default()
    }

    /// Scripts of the current document that faulted.
    #[must_use]
    pub fn script_faults(&self) -> &[ScriptFault] {
        self.document
            .as_ref()
            .map(|d| d.runtime.faults())
            .unwrap_or_default()
    }

    /// Run `source` in the current document and re-render if it mutated
    /// the tree. Returns whether the script completed.
    pub fn run_script(&mut self, identity: &str, source: &str) -> bool {
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        let completed = doc.runtime.run_script(identity, source);
        if doc.runtime.take_dirty() {
            self.render();
        }
        completed
    }

    /// The configuration this tab renders with.
    #[must_use]
    pub const fn config(&self) -> &BrowserConfig {
        &self.config
    }
}

impl Document {
    fn set_focus(&mut self, node: Option<NodeId>) {
        let mut dom = self.dom.borrow_mut();
        if let Some(old) = self.focus.take()
            && let Some(element) = dom.as_element_mut(old)
        {
            element.focused = false;
        }
        if let Some(new) = node
            && let Some(element) = dom.as_element_mut(new)
        {
            element.focused = true;
            self.focus = Some(new);
        }
    }
}

/// What a click on some node does.
#[derive(Debug, PartialEq)]
enum ClickAction {
    Navigate(Url),
    Focus(NodeId),
    Submit(NodeId),
}

/// Walk up from the clicked node to the first element that reacts.
fn click_action(dom: &DomTree, node: NodeId, base: &Url) -> Option<ClickAction> {
    std::iter::once(node)
        .chain(dom.ancestors(node))
        .find_map(|id| match dom.tag_name(id)? {
            "a" => {
                let href = dom.attribute(id, "href")?;
                resolve(href, Some(base)).map(ClickAction::Navigate)
            }
            "input" => Some(ClickAction::Focus(id)),
            "button" => dom
                .ancestors(id)
                .find(|&a| dom.tag_name(a) == Some("form"))
                .map(ClickAction::Submit),
            _ => None,
        })
}

fn is_stylesheet_link(dom: &DomTree, node: NodeId) -> bool {
    dom.attribute(node, "rel")
        .is_some_and(|rel| rel.split_ascii_whitespace().any(|r| r.eq_ignore_ascii_case("stylesheet")))
}
