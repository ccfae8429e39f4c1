// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Whole-record JSON helpers.

use serde_json::Value;

/// Lays `patch` over `base`.
///
/// When both are objects, returns `base` with every top-level key of `patch`
/// replaced. Otherwise `patch` wins outright (including `null` patches for
/// deletes). Nested objects are replaced, not merged.
pub fn overlay(base: &Value, patch: &Value) -> Value {
    match (base, patch) {
        (Value::Object(base_fields), Value::Object(patch_fields)) => {
            let mut merged = base_fields.clone();
            for (key, value) in patch_fields {
                merged.insert(key.clone(), value.clone());
            }
            Value::Object(merged)
        }
        (_, patch) => patch.clone(),
    }
}

/// Returns the top-level keys whose values differ between two objects.
///
/// Used to describe conflicts. Non-object values have no fields, so the
/// result is empty for them.
pub fn changed_fields(a: &Value, b: &Value) -> Vec<String> {
    match (a, b) {
        (Value::Object(a_fields), Value::Object(b_fields)) => {
            let mut keys: Vec<String> = a_fields
                .keys()
                .chain(b_fields.keys())
                .filter(|key| a_fields.get(*key) != b_fields.get(*key))
                .cloned()
                .collect();
            keys.sort();
            keys.dedup();
            keys
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
#[path = "patch_tests.rs"]
mod tests;
