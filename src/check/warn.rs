// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Checks that flag suspicious but valid status conditions.

use super::conditions::{highest_negative_priority_condition, CheckConditions};
use super::fail::type_list;
use crate::condition::ConditionStatus;
use crate::conditions::{get, is_true};
use crate::constants::{READY_CONDITION, RECONCILING_CONDITION, STALLED_CONDITION};
use crate::object::StatusObject;

/// Negative polarity condition present while Ready is True.
pub(super) fn warn_0001<K: StatusObject + ?Sized>(
    obj: &K,
    context: &CheckConditions,
) -> Option<String> {
    if !is_true(obj, READY_CONDITION) || context.negative_polarity.is_empty() {
        return None;
    }

    let present: Vec<&str> = context
        .negative_polarity
        .iter()
        .filter(|t| get(obj, t).is_some())
        .map(String::as_str)
        .collect();

    (!present.is_empty()).then(|| {
        format!(
            "negative polarity condition present when Ready condition is True: {}",
            type_list(&present)
        )
    })
}

/// A not-ready Ready should carry the reason and message of the highest priority
/// negative polarity condition.
///
/// Reconciling and Stalled are exempt: Ready keeps its own value while they lead.
pub(super) fn warn_0002<K: StatusObject + ?Sized>(
    obj: &K,
    context: &CheckConditions,
) -> Option<String> {
    if is_true(obj, READY_CONDITION) || context.negative_polarity.is_empty() {
        return None;
    }
    let ready = get(obj, READY_CONDITION)?;

    let highest = match highest_negative_priority_condition(context, obj.conditions()) {
        Ok(highest) => highest?,
        Err(err) => return Some(err.to_string()),
    };
    if highest.r#type == RECONCILING_CONDITION || highest.r#type == STALLED_CONDITION {
        return None;
    }

    (ready.reason != highest.reason || ready.message != highest.message).then(|| {
        format!(
            "Ready condition should have the value of the highest priority negative polarity condition: Ready != {} (reason {:?} != {:?}, message {:?} != {:?})",
            highest.r#type, ready.reason, highest.reason, ready.message, highest.message
        )
    })
}

fn removable_when_false<K: StatusObject + ?Sized>(obj: &K, condition_type: &str) -> Option<String> {
    let condition = get(obj, condition_type)?;
    (condition.status == ConditionStatus::False)
        .then(|| format!("{condition_type} condition can be removed when its value is False"))
}

/// Reconciling=False can be removed.
pub(super) fn warn_0003<K: StatusObject + ?Sized>(obj: &K, _: &CheckConditions) -> Option<String> {
    removable_when_false(obj, RECONCILING_CONDITION)
}

/// Stalled=False can be removed.
pub(super) fn warn_0004<K: StatusObject + ?Sized>(obj: &K, _: &CheckConditions) -> Option<String> {
    removable_when_false(obj, STALLED_CONDITION)
}

/// Every condition carries an observed generation.
pub(super) fn warn_0005<K: StatusObject + ?Sized>(obj: &K, _: &CheckConditions) -> Option<String> {
    let missing: Vec<&str> = obj
        .conditions()
        .iter()
        .filter(|c| c.observed_generation < 1)
        .map(|c| c.r#type.as_str())
        .collect();

    (!missing.is_empty()).then(|| {
        format!(
            "missing ObservedGeneration from status condition: {}",
            type_list(&missing)
        )
    })
}
