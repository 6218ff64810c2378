//! Deduplicated warnings.
//!
//! Used by the markup, style, layout, and script components to report
//! content they ignore. Each distinct message is logged once per document
//! session; [`clear_warnings`] starts a new session.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about ignored content (logs once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("Layout", "ignoring HTML contents inside button");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let first_time = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if first_time {
        log::warn!(target: "sprig", "[{component}] {message}");
    }
}

/// Whether `message` from `component` has been reported since the last
/// [`clear_warnings`].
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key))
}

/// Forget all recorded warnings (call when loading a new page).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_recorded_until_cleared() {
        warn_once("Test", "recorded");
        assert!(was_warned("Test", "recorded"));
        assert!(!was_warned("Test", "never sent"));
    }
}
