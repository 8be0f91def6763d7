//! Shared test utilities for the feature template writers workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Test data path helpers
//! - Skip macros for optional test data
//! - Feature and geometry generators
//! - Common test fixtures
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_json_eq, fixtures};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro to skip a test if the required file is not found.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_test_file;
///
/// #[test]
/// fn test_render_sample() {
///     let path = require_test_file!("stations.geojson");
///     // Test code using path...
/// }
/// ```
///
/// If the file is not found, the test will print a skip message and return early.
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Test file '{}' not found. Set TEST_DATA_DIR to its location.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Macro asserting that two JSON documents are equal, ignoring formatting.
///
/// Both sides are parsed with `serde_json`; the left side is usually writer
/// output, the right side an expected document or `json!` value.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_json_eq;
///
/// assert_json_eq!(r#"{"a": 1}"#, serde_json::json!({"a": 1}));
/// ```
#[macro_export]
macro_rules! assert_json_eq {
    ($left:expr, $right:expr) => {{
        let left: serde_json::Value = serde_json::from_str(&$left)
            .unwrap_or_else(|e| panic!("left side is not JSON ({}): {}", e, $left));
        let right: serde_json::Value = serde_json::to_value(&$right)
            .expect("right side must serialize to JSON");
        let right = match right {
            serde_json::Value::String(s) => serde_json::from_str(&s).unwrap_or(serde_json::Value::String(s)),
            other => other,
        };
        if left != right {
            panic!(
                "assertion failed: `(left == right)` for JSON\n  left: `{}`,\n right: `{}`",
                left, right
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_json_eq_ignores_whitespace() {
        let output = String::from("{\"a\": [1, 2],\n \"b\": null}");
        assert_json_eq!(output, serde_json::json!({"b": null, "a": [1, 2]}));
        assert_json_eq!(output, r#"{"a":[1,2],"b":null}"#);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_json_eq_fails() {
        assert_json_eq!(String::from("{\"a\": 1}"), serde_json::json!({"a": 2}));
    }
}
