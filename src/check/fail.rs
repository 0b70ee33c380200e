// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Checks whose failure means the status violates the condition contract.
//!
//! Each check returns `None` when the object passes, or the failure message.

use super::conditions::CheckConditions;
use crate::condition::ConditionStatus;
use crate::conditions::{get, has, is_ready, is_reconciling, is_true};
use crate::constants::{READY_CONDITION, RECONCILING_CONDITION, STALLED_CONDITION};
use crate::object::StatusObject;

/// Render condition types as `[A B]`.
pub(super) fn type_list(types: &[&str]) -> String {
    format!("[{}]", types.join(" "))
}

/// Negative polarity condition cannot be True when Ready is True.
pub(super) fn fail_0001<K: StatusObject + ?Sized>(
    obj: &K,
    context: &CheckConditions,
) -> Option<String> {
    if !is_true(obj, READY_CONDITION) || context.negative_polarity.is_empty() {
        return None;
    }

    let problems: Vec<&str> = obj
        .conditions()
        .iter()
        .filter(|c| context.is_negative_polarity(&c.r#type) && c.status == ConditionStatus::True)
        .map(|c| c.r#type.as_str())
        .collect();

    (!problems.is_empty()).then(|| {
        format!(
            "negative polarity condition cannot be True when Ready condition is True: {}",
            type_list(&problems)
        )
    })
}

/// Ready must always be present.
pub(super) fn fail_0002<K: StatusObject + ?Sized>(obj: &K, _: &CheckConditions) -> Option<String> {
    (!has(obj, READY_CONDITION)).then(|| "Ready condition must always be present".to_string())
}

/// Ready must be False while `condition_type` is True.
fn ready_false_while<K: StatusObject + ?Sized>(obj: &K, condition_type: &str) -> bool {
    let (Some(ready), Some(other)) = (get(obj, READY_CONDITION), get(obj, condition_type)) else {
        return true;
    };
    other.status != ConditionStatus::True || ready.status == ConditionStatus::False
}

/// Ready must be False when Reconciling is True.
pub(super) fn fail_0003<K: StatusObject + ?Sized>(obj: &K, _: &CheckConditions) -> Option<String> {
    (!ready_false_while(obj, RECONCILING_CONDITION)).then(|| {
        "Ready condition must be False when Reconciling condition is True".to_string()
    })
}

/// Ready must be False when Stalled is True.
pub(super) fn fail_0004<K: StatusObject + ?Sized>(obj: &K, _: &CheckConditions) -> Option<String> {
    (!ready_false_while(obj, STALLED_CONDITION))
        .then(|| "Ready condition must be False when Stalled condition is True".to_string())
}

/// Reconciling and Stalled are never present together.
pub(super) fn fail_0005<K: StatusObject + ?Sized>(obj: &K, _: &CheckConditions) -> Option<String> {
    (has(obj, RECONCILING_CONDITION) && has(obj, STALLED_CONDITION)).then(|| {
        "only one of Reconciling condition or Stalled condition must be present at a time"
            .to_string()
    })
}

/// Status observed generation never exceeds the object generation.
pub(super) fn fail_0006<K: StatusObject + ?Sized>(obj: &K, _: &CheckConditions) -> Option<String> {
    (obj.status_observed_generation() > obj.generation()).then(|| {
        "the status ObservedGeneration must be less than or equal to the object Generation"
            .to_string()
    })
}

/// An object that has not observed its latest generation is not ready.
pub(super) fn fail_0007<K: StatusObject + ?Sized>(obj: &K, _: &CheckConditions) -> Option<String> {
    (obj.status_observed_generation() < obj.generation() && is_ready(obj)).then(|| {
        "Ready condition must be False when the status ObservedGeneration is less than the object Generation"
            .to_string()
    })
}

/// A ready object has no condition behind the latest generation.
pub(super) fn fail_0008<K: StatusObject + ?Sized>(obj: &K, _: &CheckConditions) -> Option<String> {
    if !is_ready(obj) {
        return None;
    }

    let generation = obj.generation();
    let problems: Vec<&str> = obj
        .conditions()
        .iter()
        .filter(|c| c.observed_generation < generation)
        .map(|c| c.r#type.as_str())
        .collect();

    (!problems.is_empty()).then(|| {
        format!(
            "Ready condition must be False when any status condition's ObservedGeneration is less than the object Generation: {}",
            type_list(&problems)
        )
    })
}

/// A ready object's conditions all carry the status observed generation.
pub(super) fn fail_0009<K: StatusObject + ?Sized>(obj: &K, _: &CheckConditions) -> Option<String> {
    if !is_ready(obj) {
        return None;
    }

    let observed = obj.status_observed_generation();
    let problems: Vec<&str> = obj
        .conditions()
        .iter()
        .filter(|c| c.observed_generation != observed)
        .map(|c| c.r#type.as_str())
        .collect();

    (!problems.is_empty()).then(|| {
        format!(
            "status conditions' ObservedGenerations must be equal to the status ObservedGeneration when Ready condition is True: {}",
            type_list(&problems)
        )
    })
}

/// While reconciling, the status observed generation lags behind Reconciling's.
pub(super) fn fail_0010<K: StatusObject + ?Sized>(obj: &K, _: &CheckConditions) -> Option<String> {
    if !is_reconciling(obj) {
        return None;
    }

    let reconciling = get(obj, RECONCILING_CONDITION)?;
    (obj.status_observed_generation() >= reconciling.observed_generation).then(|| {
        "the status ObservedGeneration must be less than the Reconciling condition ObservedGeneration when Reconciling condition is True"
            .to_string()
    })
}
