// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! JSON merge patches (RFC 7386).
//!
//! [`diff`] computes the merge patch between two JSON documents and [`apply`]
//! applies one. Arrays are treated as opaque values and replaced as a whole.

use serde_json::{Map, Value};

/// Compute the merge patch that turns `before` into `after`.
///
/// Returns `None` when the documents are equal. Fields removed in `after` are set to
/// `null` in the patch.
#[must_use]
pub fn diff(before: &Value, after: &Value) -> Option<Value> {
    match (before, after) {
        (Value::Object(before), Value::Object(after)) => {
            let mut patch = Map::new();

            for (key, after_value) in after {
                match before.get(key) {
                    Some(before_value) => {
                        if let Some(nested) = diff(before_value, after_value) {
                            patch.insert(key.clone(), nested);
                        }
                    }
                    None => {
                        patch.insert(key.clone(), after_value.clone());
                    }
                }
            }

            for key in before.keys() {
                if !after.contains_key(key) {
                    patch.insert(key.clone(), Value::Null);
                }
            }

            if patch.is_empty() {
                None
            } else {
                Some(Value::Object(patch))
            }
        }
        (before, after) if before == after => None,
        (_, after) => Some(after.clone()),
    }
}

/// Apply a merge patch to `target` in place.
pub fn apply(target: &mut Value, patch: &Value) {
    let Value::Object(patch) = patch else {
        *target = patch.clone();
        return;
    };

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }

    if let Value::Object(target) = target {
        for (key, value) in patch {
            if value.is_null() {
                target.remove(key);
            } else {
                apply(target.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
    }
}

#[cfg(test)]
#[path = "merge_patch_tests.rs"]
mod merge_patch_tests;
