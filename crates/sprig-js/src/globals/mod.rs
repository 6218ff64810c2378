//! JavaScript globals backed by the host bridge.
//!
//! A single native function, `call_host(name, ...args)`, is registered on
//! the global object. The prelude script builds the DOM-facing API on top of
//! it:
//!
//! - `console.log(...args)` - [Console Standard § 1.1.1](https://console.spec.whatwg.org/#log)
//! - `document.querySelectorAll(selector)` - [§ 4.2.6](https://dom.spec.whatwg.org/#dom-parentnode-queryselectorall)
//! - `Node.prototype.getAttribute` / `setAttribute` - [§ 4.9](https://dom.spec.whatwg.org/#interface-element)
//!
//! Script-visible nodes are `Node` wrappers around an integer handle.

use std::cell::RefCell;
use std::rc::Rc;

use boa_engine::object::builtins::JsArray;
use boa_engine::{
    Context, Finalize, JsError, JsNativeError, JsResult, JsString, JsValue, NativeFunction,
    Source, Trace, js_string,
};

use crate::ScriptError;
use crate::bridge::{Bridge, HostFunction};

const PRELUDE: &str = include_str!("prelude.js");

/// Closure capture for `call_host`; the bridge holds no GC-managed values.
#[derive(Trace, Finalize)]
struct BridgeCapture(#[unsafe_ignore_trace] Rc<RefCell<Bridge>>);

/// Register `call_host` and evaluate the prelude.
///
/// # Errors
///
/// Returns [`ScriptError::Setup`] if the global cannot be defined or the
/// prelude fails to evaluate.
pub fn register_globals(context: &mut Context, bridge: &Rc<RefCell<Bridge>>) -> Result<(), ScriptError> {
    let host = NativeFunction::from_copy_closure_with_captures(
        |_this, args, capture, context| call_host(&capture.0, args, context),
        BridgeCapture(Rc::clone(bridge)),
    );
    context
        .register_global_callable(js_string!("call_host"), 1, host)
        .map_err(|e| ScriptError::Setup(e.to_string()))?;
    let _ = context
        .eval(Source::from_bytes(PRELUDE))
        .map_err(|e| ScriptError::Setup(e.to_string()))?;
    Ok(())
}

/// Dispatch one `call_host(name, ...args)` call from script.
fn call_host(bridge: &Rc<RefCell<Bridge>>, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let name = string_arg(args, 0, context)?;
    let function: HostFunction = name.parse().map_err(|_| {
        JsError::from(JsNativeError::typ().with_message(format!("unknown host function {name:?}")))
    })?;

    match function {
        HostFunction::Log => {
            let message = string_arg(args, 1, context)?;
            bridge.borrow_mut().log(message);
            Ok(JsValue::undefined())
        }
        HostFunction::QuerySelectorAll => {
            let selector = string_arg(args, 1, context)?;
            let handles = bridge
                .borrow_mut()
                .query_selector_all(&selector)
                .map_err(into_js_error)?;
            let array = JsArray::from_iter(handles.into_iter().map(JsValue::from), context);
            Ok(array.into())
        }
        HostFunction::GetAttribute => {
            let handle = handle_arg(args, 1, context)?;
            let attribute = string_arg(args, 2, context)?;
            let value = bridge
                .borrow()
                .get_attribute(handle, &attribute)
                .map_err(into_js_error)?;
            Ok(value.map_or_else(JsValue::null, |v| JsValue::from(JsString::from(v.as_str()))))
        }
        HostFunction::SetAttribute => {
            let handle = handle_arg(args, 1, context)?;
            let attribute = string_arg(args, 2, context)?;
            let value = string_arg(args, 3, context)?;
            bridge
                .borrow_mut()
                .set_attribute(handle, &attribute, &value)
                .map_err(into_js_error)?;
            Ok(JsValue::undefined())
        }
    }
}

fn string_arg(args: &[JsValue], index: usize, context: &mut Context) -> JsResult<String> {
    let value = args.get(index).cloned().unwrap_or_else(JsValue::undefined);
    Ok(value.to_string(context)?.to_std_string_escaped())
}

fn handle_arg(args: &[JsValue], index: usize, context: &mut Context) -> JsResult<u32> {
    args.get(index).cloned().unwrap_or_else(JsValue::undefined).to_u32(context)
}

/// Host errors surface in script as exceptions.
fn into_js_error(error: ScriptError) -> JsError {
    match error {
        ScriptError::BadSelector { .. } => JsNativeError::syntax().with_message(error.to_string()),
        _ => JsNativeError::typ().with_message(error.to_string()),
    }
    .into()
}
