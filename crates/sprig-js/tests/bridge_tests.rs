//! Integration tests for the script bridge.

use std::cell::RefCell;
use std::rc::Rc;

use sprig_js::{DomHandle, JsRuntime, ScriptError};

fn runtime(markup: &str) -> JsRuntime {
    let dom: DomHandle = Rc::new(RefCell::new(sprig_html::parse(markup)));
    JsRuntime::new(dom).unwrap()
}

fn eval_string(runtime: &mut JsRuntime, source: &str) -> String {
    let value = runtime.execute(source).unwrap();
    value
        .as_string()
        .map(|s| s.to_std_string_escaped())
        .unwrap_or_default()
}

#[test]
fn test_console_log_joins_arguments() {
    let mut rt = runtime("");
    assert!(rt.run_script("inline script #1", "console.log('a', 1, true)"));
    assert_eq!(rt.console(), vec!["a 1 true"]);
}

#[test]
fn test_query_selector_all_in_document_order() {
    let mut rt = runtime("<div><p id=one>a</p></div><p id=two>b</p><span><p id=three>c</p></span>");
    let ids = eval_string(
        &mut rt,
        "document.querySelectorAll('p').map(function (n) { return n.getAttribute('id'); }).join(',')",
    );
    assert_eq!(ids, "one,two,three");

    let ids = eval_string(
        &mut rt,
        "document.querySelectorAll('div p').map(function (n) { return n.getAttribute('id'); }).join(',')",
    );
    assert_eq!(ids, "one");
}

#[test]
fn test_no_matches_is_empty_array() {
    let mut rt = runtime("<p>a</p>");
    let length = rt.execute("document.querySelectorAll('table').length").unwrap();
    assert_eq!(length.as_number(), Some(0.0));
}

#[test]
fn test_same_node_same_handle() {
    let mut rt = runtime("<p>a</p><p>b</p>");
    let same = rt
        .execute(
            "var a = document.querySelectorAll('p'); \
             var b = document.querySelectorAll('body p'); \
             a[1].handle === b[1].handle && a[0].handle !== a[1].handle",
        )
        .unwrap();
    assert_eq!(same.as_boolean(), Some(true));
    assert_eq!(rt.handle_count(), 2);
}

#[test]
fn test_missing_attribute_is_null() {
    let mut rt = runtime("<p>a</p>");
    let value = rt
        .execute("document.querySelectorAll('p')[0].getAttribute('class') === null")
        .unwrap();
    assert_eq!(value.as_boolean(), Some(true));
}

#[test]
fn test_set_attribute_updates_tree_and_marks_dirty() {
    let mut rt = runtime("<input name=q value=old>");
    assert!(!rt.take_dirty());
    assert!(rt.run_script(
        "inline script #1",
        "document.querySelectorAll('input')[0].setAttribute('value', 'new')",
    ));
    assert!(rt.take_dirty());
    assert!(!rt.take_dirty());

    let dom = rt.dom();
    let tree = dom.borrow();
    let input = tree
        .iter_all()
        .find(|&id| tree.tag_name(id) == Some("input"))
        .unwrap();
    assert_eq!(tree.attribute(input, "value"), Some("new"));
}

#[test]
fn test_fault_is_contained() {
    let mut rt = runtime("<p>a</p>");
    assert!(!rt.run_script("https://example.org/bad.js", "console.log('before'); undefinedFunction();"));
    assert!(rt.run_script("inline script #2", "console.log('after')"));

    assert_eq!(rt.console(), vec!["before", "after"]);
    assert_eq!(rt.faults().len(), 1);
    assert_eq!(rt.faults()[0].identity, "https://example.org/bad.js");
    assert!(matches!(rt.faults()[0].error, ScriptError::Fault { .. }));
}

#[test]
fn test_syntax_error_is_a_fault() {
    let mut rt = runtime("");
    assert!(matches!(rt.execute("function ("), Err(ScriptError::Fault { .. })));
}

#[test]
fn test_bad_selector_throws_into_script() {
    let mut rt = runtime("<p>a</p>");
    let caught = eval_string(
        &mut rt,
        "var r = 'none'; try { document.querySelectorAll('p {'); } catch (e) { r = e.name; } r",
    );
    assert_eq!(caught, "SyntaxError");
}

#[test]
fn test_forged_handle_throws() {
    let mut rt = runtime("<p>a</p>");
    let result = rt.execute("new Node(99).getAttribute('id')");
    assert!(matches!(result, Err(ScriptError::Fault { .. })));
}

#[test]
fn test_global_state_persists_between_scripts() {
    let mut rt = runtime("");
    assert!(rt.run_script("inline script #1", "var counter = 41;"));
    assert!(rt.run_script("inline script #2", "counter += 1; console.log(counter);"));
    assert_eq!(rt.console(), vec!["42"]);
}
