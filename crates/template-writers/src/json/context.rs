//! Merging of JSON-LD `@context` fragments.
//!
//! A response spanning several feature types gathers one context per
//! template; they are folded left to right into a single `@context`.

use serde_json::Value as JsonValue;

/// Fold every context into one. `None` when there is nothing to merge.
pub fn nodes_union(contexts: &[JsonValue]) -> Option<JsonValue> {
    let mut iter = contexts.iter();
    let first = iter.next()?.clone();
    Some(iter.fold(first, |acc, next| union_pair(acc, next)))
}

/// Merge two contexts, `b` after `a`.
pub fn union_pair(a: JsonValue, b: &JsonValue) -> JsonValue {
    if &a == b {
        return a;
    }
    match (a, b) {
        (JsonValue::Object(mut left), JsonValue::Object(right)) => {
            for (key, value) in right {
                left.insert(key.clone(), value.clone());
            }
            JsonValue::Object(left)
        }
        (JsonValue::Array(mut left), JsonValue::Array(right)) => {
            left.extend(right.iter().cloned());
            JsonValue::Array(left)
        }
        (JsonValue::Array(mut left), other) => {
            left.push(other.clone());
            JsonValue::Array(left)
        }
        (other, JsonValue::Array(right)) => {
            let mut merged = right.clone();
            merged.push(other);
            JsonValue::Array(merged)
        }
        (other, right) => JsonValue::Array(vec![other, right.clone()]),
    }
}
