//! Deduplicated engine warnings.
//!
//! Stages report unsupported or malformed input here instead of failing.
//! Each distinct message is forwarded to [`log::warn!`] once per process
//! (or until [`clear_warnings`] is called), with the reporting component
//! used as the log target.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings already emitted.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about unsupported or dropped input, once per unique message.
///
/// Returns `true` if the warning was emitted, `false` if it had already been
/// seen.
///
/// # Example
/// ```
/// use plume_common::warning::{clear_warnings, warn_once};
///
/// clear_warnings();
/// assert!(warn_once("css", "unsupported unit 'em' in width: 2em"));
/// assert!(!warn_once("css", "unsupported unit 'em' in width: 2em"));
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let fresh = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if fresh {
        log::warn!(target: component, "{message}");
    }
    fresh
}

/// Forget every recorded warning (call before styling a new document).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

/// Number of distinct warnings recorded since the last [`clear_warnings`].
#[must_use]
pub fn warning_count() -> usize {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map_or(0, HashSet::len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_warning_is_suppressed() {
        let message = "test_repeated_warning_is_suppressed";
        let _ = warn_once("test", message);
        assert!(!warn_once("test", message));
    }

    #[test]
    fn test_component_is_part_of_key() {
        let message = "test_component_is_part_of_key";
        let _ = warn_once("a", message);
        assert!(warn_once("b", message));
    }
}
