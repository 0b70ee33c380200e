// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Read helpers over a resource's condition list.
//!
//! All helpers are safe on missing conditions: they return `None`, `false`, an empty
//! string or 0 instead of failing. For the tri-state checks a missing condition
//! counts as `Unknown`.

use crate::condition::{Condition, ConditionStatus};
use crate::constants::{READY_CONDITION, RECONCILING_CONDITION, STALLED_CONDITION};
use crate::object::ConditionReader;
use chrono::{DateTime, Utc};

/// Find the condition with the given type.
#[must_use]
pub fn get<'a, R: ConditionReader + ?Sized>(
    from: &'a R,
    condition_type: &str,
) -> Option<&'a Condition> {
    from.conditions()
        .iter()
        .find(|condition| condition.r#type == condition_type)
}

/// Returns `true` if a condition with the given type exists.
#[must_use]
pub fn has<R: ConditionReader + ?Sized>(from: &R, condition_type: &str) -> bool {
    get(from, condition_type).is_some()
}

/// Returns `true` if a condition with any of the given types exists.
#[must_use]
pub fn has_any<R: ConditionReader + ?Sized>(from: &R, condition_types: &[&str]) -> bool {
    condition_types.iter().any(|t| has(from, t))
}

/// Returns `true` if the condition with the given type has any of the given reasons.
#[must_use]
pub fn has_any_reason<R: ConditionReader + ?Sized>(
    from: &R,
    condition_type: &str,
    reasons: &[&str],
) -> bool {
    get(from, condition_type).is_some_and(|c| reasons.contains(&c.reason.as_str()))
}

fn status_of<R: ConditionReader + ?Sized>(from: &R, condition_type: &str) -> ConditionStatus {
    get(from, condition_type).map_or(ConditionStatus::Unknown, |c| c.status)
}

/// Returns `true` if the condition exists and is `True`.
#[must_use]
pub fn is_true<R: ConditionReader + ?Sized>(from: &R, condition_type: &str) -> bool {
    status_of(from, condition_type) == ConditionStatus::True
}

/// Returns `true` if the condition exists and is `False`.
#[must_use]
pub fn is_false<R: ConditionReader + ?Sized>(from: &R, condition_type: &str) -> bool {
    status_of(from, condition_type) == ConditionStatus::False
}

/// Returns `true` if the condition is `Unknown` or does not exist.
#[must_use]
pub fn is_unknown<R: ConditionReader + ?Sized>(from: &R, condition_type: &str) -> bool {
    status_of(from, condition_type) == ConditionStatus::Unknown
}

/// Returns `true` if the resource is neither stalled nor reconciling, and `Ready` is `True`.
#[must_use]
pub fn is_ready<R: ConditionReader + ?Sized>(from: &R) -> bool {
    !is_stalled(from) && !is_reconciling(from) && is_true(from, READY_CONDITION)
}

/// Returns `true` if `Stalled` is `True` and `Reconciling` is not.
#[must_use]
pub fn is_stalled<R: ConditionReader + ?Sized>(from: &R) -> bool {
    !is_true(from, RECONCILING_CONDITION) && is_true(from, STALLED_CONDITION)
}

/// Returns `true` if `Reconciling` is `True` and `Stalled` is not.
#[must_use]
pub fn is_reconciling<R: ConditionReader + ?Sized>(from: &R) -> bool {
    !is_true(from, STALLED_CONDITION) && is_true(from, RECONCILING_CONDITION)
}

/// The reason of the condition, or an empty string.
#[must_use]
pub fn get_reason<R: ConditionReader + ?Sized>(from: &R, condition_type: &str) -> String {
    get(from, condition_type).map(|c| c.reason.clone()).unwrap_or_default()
}

/// The message of the condition, or an empty string.
#[must_use]
pub fn get_message<R: ConditionReader + ?Sized>(from: &R, condition_type: &str) -> String {
    get(from, condition_type).map(|c| c.message.clone()).unwrap_or_default()
}

/// The last transition time of the condition, if the condition exists and has one.
#[must_use]
pub fn get_last_transition_time<R: ConditionReader + ?Sized>(
    from: &R,
    condition_type: &str,
) -> Option<DateTime<Utc>> {
    get(from, condition_type).and_then(|c| c.last_transition_time)
}

/// The observed generation of the condition, or 0.
#[must_use]
pub fn get_observed_generation<R: ConditionReader + ?Sized>(from: &R, condition_type: &str) -> i64 {
    get(from, condition_type).map_or(0, |c| c.observed_generation)
}

#[cfg(test)]
#[path = "getter_tests.rs"]
mod getter_tests;
