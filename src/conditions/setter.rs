// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Write helpers for a resource's condition list.
//!
//! These functions only modify the in-memory object. Persisting the result is the job
//! of the [`patch`](crate::patch) helper.
//!
//! # Transition Times
//!
//! [`set`] keeps `lastTransitionTime` unless the state of the condition (status, reason
//! or message) actually changes. `observedGeneration` is always refreshed to the
//! resource's current generation.
//!
//! # Example
//!
//! ```rust,ignore
//! use reconcile_status::conditions::{mark_reconciling, mark_false};
//!
//! mark_reconciling(&mut obj, "Progressing", "reconciliation in progress");
//! mark_false(&mut obj, "Ready", "Failed", &format!("fetch failed: {err}"));
//! ```

use crate::condition::{now, trim_condition_message, Condition};
use crate::conditions::merge::{aggregate, mirror, summary};
use crate::conditions::options::{MergeOptions, MirrorOptions};
use crate::constants::{CONDITION_DISPLAY_ORDER, RECONCILING_CONDITION, STALLED_CONDITION};
use crate::object::{ConditionReader, ConditionWriter};
use std::cmp::Ordering;

/// Set the given condition on the resource.
///
/// Passing `None` is a no-op. The observed generation is always set to the resource
/// generation and the message is trimmed to the maximum length. The last transition
/// time is only updated when the state of an existing condition changes; new
/// conditions keep a transition time they already carry.
///
/// The whole list is re-sorted afterwards: `Stalled`, `Reconciling` and `Ready` first,
/// then the rest by descending observed generation and ascending type.
pub fn set<W: ConditionWriter + ?Sized>(to: &mut W, condition: impl Into<Option<Condition>>) {
    let Some(mut condition) = condition.into() else {
        return;
    };

    condition.observed_generation = to.generation();
    condition.message = trim_condition_message(&condition.message);

    let conditions = to.conditions_mut();
    match conditions
        .iter_mut()
        .find(|existing| existing.r#type == condition.r#type)
    {
        Some(existing) if existing.has_same_state(&condition) => {
            condition.last_transition_time = existing.last_transition_time;
            if existing.observed_generation != condition.observed_generation {
                *existing = condition;
            }
        }
        Some(existing) => {
            condition.last_transition_time = Some(now());
            *existing = condition;
        }
        None => {
            if condition.last_transition_time.is_none() {
                condition.last_transition_time = Some(now());
            }
            conditions.push(condition);
        }
    }

    conditions.sort_by(display_order);
}

/// Set `Status=True` for the condition with the given type, reason and message.
pub fn mark_true<W: ConditionWriter + ?Sized>(
    to: &mut W,
    condition_type: &str,
    reason: &str,
    message: &str,
) {
    set(to, Condition::true_condition(condition_type, reason, message));
}

/// Set `Status=False` for the condition with the given type, reason and message.
pub fn mark_false<W: ConditionWriter + ?Sized>(
    to: &mut W,
    condition_type: &str,
    reason: &str,
    message: &str,
) {
    set(to, Condition::false_condition(condition_type, reason, message));
}

/// Set `Status=Unknown` for the condition with the given type, reason and message.
pub fn mark_unknown<W: ConditionWriter + ?Sized>(
    to: &mut W,
    condition_type: &str,
    reason: &str,
    message: &str,
) {
    set(to, Condition::unknown_condition(condition_type, reason, message));
}

/// Set `Reconciling=True` and delete `Stalled`.
///
/// This is normally called at the beginning of a reconcile run.
pub fn mark_reconciling<W: ConditionWriter + ?Sized>(to: &mut W, reason: &str, message: &str) {
    delete(to, STALLED_CONDITION);
    mark_true(to, RECONCILING_CONDITION, reason, message);
}

/// Set `Stalled=True` and delete `Reconciling`.
///
/// This is normally called at the end of a reconcile run that cannot make progress
/// without a change to the resource.
pub fn mark_stalled<W: ConditionWriter + ?Sized>(to: &mut W, reason: &str, message: &str) {
    delete(to, RECONCILING_CONDITION);
    mark_true(to, STALLED_CONDITION, reason, message);
}

/// Delete the condition with the given type.
pub fn delete<W: ConditionWriter + ?Sized>(to: &mut W, condition_type: &str) {
    to.conditions_mut()
        .retain(|condition| condition.r#type != condition_type);
}

/// Set a summary of the resource's own conditions as `target`.
///
/// If no condition is in scope, the target condition is left untouched.
pub fn set_summary<W: ConditionWriter + ?Sized>(to: &mut W, target: &str, options: &MergeOptions) {
    let condition = summary(&*to, target, options);
    set(to, condition);
}

/// Mirror the `Ready` condition of `from` as `target`.
///
/// If `from` has no `Ready` condition and no fallback is configured, the target
/// condition is left untouched.
pub fn set_mirror<W, R>(to: &mut W, target: &str, from: &R, options: &MirrorOptions)
where
    W: ConditionWriter + ?Sized,
    R: ConditionReader + ?Sized,
{
    set(to, mirror(from, target, options));
}

/// Set the aggregation of the conditions of many resources as `target`.
///
/// If none of the resources has a condition in scope, the target condition is left
/// untouched.
pub fn set_aggregate<W: ConditionWriter + ?Sized>(
    to: &mut W,
    target: &str,
    from: &[&dyn ConditionReader],
    options: &MergeOptions,
) {
    set(to, aggregate(from, target, options));
}

fn display_weight(condition_type: &str) -> Option<usize> {
    CONDITION_DISPLAY_ORDER
        .iter()
        .position(|well_known| *well_known == condition_type)
}

/// Ordering of conditions designed for the convenience of the consumer, i.e. kubectl.
///
/// Well-known types go first in their fixed order, followed by all other conditions
/// sorted by highest observed generation and then by type.
pub(crate) fn display_order(a: &Condition, b: &Condition) -> Ordering {
    match (display_weight(&a.r#type), display_weight(&b.r#type)) {
        (Some(wa), Some(wb)) => wa.cmp(&wb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b
            .observed_generation
            .cmp(&a.observed_generation)
            .then_with(|| a.r#type.cmp(&b.r#type)),
    }
}

#[cfg(test)]
#[path = "setter_tests.rs"]
mod setter_tests;
