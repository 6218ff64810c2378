//! Script bridge for the sprig renderer.
//!
//! Uses [Boa](https://boajs.dev/) as the JavaScript engine.
//!
//! # Example
//!
//! ```ignore
//! use std::{cell::RefCell, rc::Rc};
//! use sprig_js::JsRuntime;
//!
//! let dom = Rc::new(RefCell::new(sprig_html::parse("<p id=a>hi</p>")));
//! let mut runtime = JsRuntime::new(dom)?;
//! runtime.run_script("inline script #1", "console.log(document.querySelectorAll('p').length)");
//! ```
//!
//! # Implemented
//!
//! - Script execution via [`JsRuntime::execute`], and fault-isolated
//!   execution via [`JsRuntime::run_script`]
//! - `console.log()`
//! - `document.querySelectorAll()` with tag and descendant selectors
//! - `Node.getAttribute()` / `Node.setAttribute()` over opaque handles
//!
//! # Not Yet Implemented
//!
//! [§ 2.6 Interface EventTarget](https://dom.spec.whatwg.org/#interface-eventtarget)
//! - `addEventListener()` and event dispatch
//!
//! [§ 8.6 Timers](https://html.spec.whatwg.org/multipage/timers-and-user-prompts.html#timers)
//! - `setTimeout()` / `setInterval()`
//!
//! [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
//! - Tree mutation (`createElement`, `appendChild`, `innerHTML`)

mod bridge;
mod globals;
mod handles;

use std::cell::RefCell;
use std::rc::Rc;

use boa_engine::{Context, JsValue, Source};
use sprig_css::ParseError;
use thiserror::Error;

pub use bridge::{Bridge, DomHandle, HostFunction};
pub use handles::HandleTable;

/// Errors raised by the script bridge.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script threw or failed to parse.
    #[error("{message}")]
    Fault {
        /// The interpreter's description of the failure.
        message: String,
    },
    /// A selector passed to `querySelectorAll` did not parse.
    #[error("invalid selector {selector:?}: {source}")]
    BadSelector {
        /// The selector text as given by the script.
        selector: String,
        /// Where parsing stopped.
        #[source]
        source: ParseError,
    },
    /// Script passed a handle this document never issued.
    #[error("unknown node handle {0}")]
    UnknownHandle(u32),
    /// The runtime could not install its globals.
    #[error("script runtime setup failed: {0}")]
    Setup(String),
}

/// A script that faulted during [`JsRuntime::run_script`].
#[derive(Debug)]
pub struct ScriptFault {
    /// The script's URL, or a label such as `inline script #2`.
    pub identity: String,
    /// What went wrong.
    pub error: ScriptError,
}

/// JavaScript runtime for one document.
///
/// [§ 8.1.6 JavaScript execution context](https://html.spec.whatwg.org/multipage/webappapis.html)
///
/// The runtime is created when the document is loaded and dropped on
/// navigation, taking its handle table with it.
pub struct JsRuntime {
    context: Context,
    bridge: Rc<RefCell<Bridge>>,
    faults: Vec<ScriptFault>,
}

impl JsRuntime {
    /// Create a runtime over `dom` with the bridge globals registered.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Setup`] if the globals cannot be installed.
    pub fn new(dom: DomHandle) -> Result<Self, ScriptError> {
        let mut context = Context::default();
        let bridge = Rc::new(RefCell::new(Bridge::new(dom)));
        globals::register_globals(&mut context, &bridge)?;
        Ok(Self {
            context,
            bridge,
            faults: Vec::new(),
        })
    }

    /// Execute JavaScript source code.
    ///
    /// [§ 4.12.1.1 Processing model](https://html.spec.whatwg.org/multipage/scripting.html#script-processing-model)
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Fault`] if the source contains syntax errors or
    /// throws an uncaught exception.
    pub fn execute(&mut self, source: &str) -> Result<JsValue, ScriptError> {
        self.context
            .eval(Source::from_bytes(source))
            .map_err(|e| ScriptError::Fault {
                message: e.to_string(),
            })
    }

    /// Execute a document script, containing any fault.
    ///
    /// A fault is logged with `identity` and recorded in [`Self::faults`];
    /// the runtime stays usable for the next script. Returns whether the
    /// script ran to completion.
    pub fn run_script(&mut self, identity: &str, source: &str) -> bool {
        log::debug!("running {identity}");
        match self.execute(source) {
            Ok(_) => true,
            Err(error) => {
                log::warn!("script {identity} failed: {error}");
                self.faults.push(ScriptFault {
                    identity: identity.to_string(),
                    error,
                });
                false
            }
        }
    }

    /// Faults recorded by [`Self::run_script`], oldest first.
    #[must_use]
    pub fn faults(&self) -> &[ScriptFault] {
        &self.faults
    }

    /// Console output produced so far.
    #[must_use]
    pub fn console(&self) -> Vec<String> {
        self.bridge.borrow().console().to_vec()
    }

    /// Number of node handles issued to script.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.bridge.borrow().handles().len()
    }

    /// The tree scripts operate on.
    #[must_use]
    pub fn dom(&self) -> DomHandle {
        Rc::clone(self.bridge.borrow().dom())
    }

    /// Whether script has mutated the document since the last call.
    pub fn take_dirty(&mut self) -> bool {
        self.bridge.borrow_mut().take_dirty()
    }
}
