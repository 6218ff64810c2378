//! Host side of the script bridge.
//!
//! All DOM bookkeeping for scripts lives here: the handle table, the shared
//! tree, captured console output, and whether a script has mutated the
//! document since the host last looked.

use std::cell::RefCell;
use std::rc::Rc;

use sprig_css::parse_selector;
use sprig_dom::DomTree;
use strum_macros::{Display, EnumString};

use crate::ScriptError;
use crate::handles::HandleTable;

/// A document tree shared between the host pipeline and the interpreter.
pub type DomHandle = Rc<RefCell<DomTree>>;

/// The functions the host exports to script through `call_host`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "camelCase")]
pub enum HostFunction {
    /// `log(message)`
    Log,
    /// `querySelectorAll(selector) -> [handle]`
    QuerySelectorAll,
    /// `getAttribute(handle, name) -> string | null`
    GetAttribute,
    /// `setAttribute(handle, name, value)`
    SetAttribute,
}

/// Per-document state reachable from host functions.
#[derive(Debug)]
pub struct Bridge {
    dom: DomHandle,
    handles: HandleTable,
    console: Vec<String>,
    dirty: bool,
}

impl Bridge {
    /// Create a bridge over `dom` with an empty handle table.
    #[must_use]
    pub fn new(dom: DomHandle) -> Self {
        Self {
            dom,
            handles: HandleTable::new(),
            console: Vec::new(),
            dirty: false,
        }
    }

    /// The shared tree.
    #[must_use]
    pub const fn dom(&self) -> &DomHandle {
        &self.dom
    }

    /// The handle table.
    #[must_use]
    pub const fn handles(&self) -> &HandleTable {
        &self.handles
    }

    /// Everything scripts have logged, oldest first.
    #[must_use]
    pub fn console(&self) -> &[String] {
        &self.console
    }

    /// Return and reset the mutation flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Record a console line.
    pub fn log(&mut self, message: String) {
        log::info!(target: "sprig_js::console", "{message}");
        self.console.push(message);
    }

    /// Handles of every node matching `selector`, in document order.
    ///
    /// [§ 4.2.6 querySelectorAll](https://dom.spec.whatwg.org/#dom-parentnode-queryselectorall)
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::BadSelector`] if `selector` does not parse.
    pub fn query_selector_all(&mut self, selector: &str) -> Result<Vec<u32>, ScriptError> {
        let parsed = parse_selector(selector).map_err(|source| ScriptError::BadSelector {
            selector: selector.to_string(),
            source,
        })?;
        let dom = self.dom.borrow();
        let matches: Vec<_> = dom
            .iter_all()
            .filter(|&id| parsed.matches(&dom, id))
            .collect();
        drop(dom);
        Ok(matches
            .into_iter()
            .map(|id| self.handles.handle_for(id))
            .collect())
    }

    /// Value of attribute `name` on the node behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::UnknownHandle`] for a handle this bridge never
    /// issued.
    pub fn get_attribute(&self, handle: u32, name: &str) -> Result<Option<String>, ScriptError> {
        let node = self
            .handles
            .node(handle)
            .ok_or(ScriptError::UnknownHandle(handle))?;
        Ok(self.dom.borrow().attribute(node, name).map(str::to_string))
    }

    /// Set attribute `name` on the node behind `handle` and mark the
    /// document dirty.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::UnknownHandle`] for a handle this bridge never
    /// issued.
    pub fn set_attribute(&mut self, handle: u32, name: &str, value: &str) -> Result<(), ScriptError> {
        let node = self
            .handles
            .node(handle)
            .ok_or(ScriptError::UnknownHandle(handle))?;
        if self.dom.borrow_mut().set_attribute(node, name, value) {
            self.dirty = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bridge(markup: &str) -> Bridge {
        Bridge::new(Rc::new(RefCell::new(sprig_html::parse(markup))))
    }

    #[test]
    fn test_host_function_names() {
        assert_eq!(
            "querySelectorAll".parse::<HostFunction>().unwrap(),
            HostFunction::QuerySelectorAll
        );
        assert_eq!(HostFunction::GetAttribute.to_string(), "getAttribute");
        assert!("eval".parse::<HostFunction>().is_err());
    }

    #[test]
    fn test_query_reuses_handles() {
        let mut bridge = bridge("<p>a</p><p>b</p>");
        let first = bridge.query_selector_all("p").unwrap();
        let second = bridge.query_selector_all("body p").unwrap();
        assert_eq!(first, vec![0, 1]);
        assert_eq!(first, second);
        assert_eq!(bridge.handles().len(), 2);
    }

    #[test]
    fn test_bad_selector() {
        let mut bridge = bridge("<p>a</p>");
        assert!(matches!(
            bridge.query_selector_all("p {"),
            Err(ScriptError::BadSelector { .. })
        ));
    }

    #[test]
    fn test_set_attribute_marks_dirty_once() {
        let mut bridge = bridge("<a href=x>a</a>");
        let handle = bridge.query_selector_all("a").unwrap()[0];
        assert!(!bridge.take_dirty());
        bridge.set_attribute(handle, "href", "y").unwrap();
        assert!(bridge.take_dirty());
        assert!(!bridge.take_dirty());
        assert_eq!(bridge.get_attribute(handle, "href").unwrap().as_deref(), Some("y"));
    }

    #[test]
    fn test_unknown_handle() {
        let bridge = bridge("");
        assert!(matches!(
            bridge.get_attribute(9, "id"),
            Err(ScriptError::UnknownHandle(9))
        ));
    }
}
