// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Merging of many conditions into a single target condition.
//!
//! The merge is designed to surface the most relevant condition for the operational
//! state of a resource: if one condition reports an error, it takes priority over the
//! others and is reflected in the target condition.
//!
//! # Algorithm
//!
//! 1. Conditions are grouped by status, polarity and (optionally) observed generation.
//! 2. Groups are sorted by priority:
//!    - P0: `Status=True`, negative polarity
//!    - P1: `Status=False`, positive polarity
//!    - P2: `Status=True`, positive polarity
//!    - P3: `Status=False`, negative polarity
//!    - P4: `Status=Unknown`
//! 3. The top group decides the status of the target condition. If the polarity of
//!    the top group differs from the polarity of the target, the status is inverted.
//! 4. Reason and message come from the top group, following the priority order of
//!    [`MergeOptions::condition_types`].

use crate::condition::{Condition, ConditionStatus};
use crate::conditions::getter::get;
use crate::conditions::options::{MergeOptions, MirrorOptions};
use crate::conditions::setter::display_order;
use crate::constants::READY_CONDITION;
use crate::object::ConditionReader;

/// The object a condition came from, used to localize reasons.
struct SourceRef {
    kind: String,
    name: String,
}

impl SourceRef {
    fn of<R: ConditionReader + ?Sized>(obj: &R) -> Self {
        Self {
            kind: obj.object_kind(),
            name: obj.object_name(),
        }
    }
}

#[derive(Clone, Copy)]
struct LocalizedCondition<'a> {
    condition: &'a Condition,
    source: &'a SourceRef,
}

struct ConditionGroup<'a> {
    status: ConditionStatus,
    negative_polarity: bool,
    generation: i64,
    conditions: Vec<LocalizedCondition<'a>>,
}

impl ConditionGroup<'_> {
    fn merge_priority(&self) -> u8 {
        match (self.status, self.negative_polarity) {
            (ConditionStatus::True, true) => 0,
            (ConditionStatus::False, false) => 1,
            (ConditionStatus::True, false) => 2,
            (ConditionStatus::False, true) => 3,
            (ConditionStatus::Unknown, _) => 4,
        }
    }
}

/// Summarize the conditions of `from` into a condition of type `target`.
///
/// All conditions except `target` are in scope, or only the types listed in
/// [`MergeOptions::condition_types`]. Returns `None` when nothing is in scope.
#[must_use]
pub fn summary<R: ConditionReader + ?Sized>(
    from: &R,
    target: &str,
    options: &MergeOptions,
) -> Option<Condition> {
    let source = SourceRef::of(from);
    let in_scope: Vec<LocalizedCondition<'_>> = from
        .conditions()
        .iter()
        .filter(|c| c.r#type != target && options.in_scope(&c.r#type))
        .map(|condition| LocalizedCondition {
            condition,
            source: &source,
        })
        .collect();

    let mut options = options.clone();
    if !step_counter_applies(&in_scope, options.step_counter_if_only_types.as_deref()) {
        options.add_step_counter = false;
    }
    if options.add_step_counter && options.step_counter.is_none() {
        let total = options
            .step_counter_if_only_types
            .as_ref()
            .or(options.condition_types.as_ref())
            .map_or(in_scope.len(), Vec::len);
        options.step_counter = Some(total);
    }

    merge(&in_scope, target, &options)
}

/// Aggregate the conditions of many objects into a condition of type `target`.
///
/// The step counter defaults to the number of source objects. Returns `None` when
/// none of the objects has a condition in scope.
#[must_use]
pub fn aggregate(
    from: &[&dyn ConditionReader],
    target: &str,
    options: &MergeOptions,
) -> Option<Condition> {
    let sources: Vec<SourceRef> = from.iter().map(|obj| SourceRef::of(*obj)).collect();

    let mut in_scope = Vec::new();
    for (obj, source) in from.iter().zip(&sources) {
        for condition in obj.conditions() {
            if options.in_scope(&condition.r#type) {
                in_scope.push(LocalizedCondition { condition, source });
            }
        }
    }

    let mut options = options.clone();
    if options.step_counter.is_none() {
        options.step_counter = Some(from.len());
    }
    if !step_counter_applies(&in_scope, options.step_counter_if_only_types.as_deref()) {
        options.add_step_counter = false;
    }
    if let Some(types) = &options.add_source_ref_if_types {
        if in_scope
            .iter()
            .any(|lc| types.contains(&lc.condition.r#type))
        {
            options.add_source_ref = true;
        }
    }

    merge(&in_scope, target, &options)
}

/// Copy the `Ready` condition of `from` as a condition of type `target`.
///
/// When `from` has no `Ready` condition the configured fallback is used, if any.
#[must_use]
pub fn mirror<R: ConditionReader + ?Sized>(
    from: &R,
    target: &str,
    options: &MirrorOptions,
) -> Option<Condition> {
    let condition = get(from, READY_CONDITION).cloned().or_else(|| {
        options.fallback.as_ref().map(|fallback| {
            let status = if fallback.value {
                ConditionStatus::True
            } else {
                ConditionStatus::False
            };
            Condition::new(target, status, fallback.reason.clone(), fallback.message.clone())
        })
    });

    condition.map(|mut condition| {
        condition.r#type = target.to_string();
        condition
    })
}

fn step_counter_applies(in_scope: &[LocalizedCondition<'_>], only: Option<&[String]>) -> bool {
    only.is_none_or(|types| {
        in_scope
            .iter()
            .all(|lc| types.contains(&lc.condition.r#type))
    })
}

fn merge(
    conditions: &[LocalizedCondition<'_>],
    target: &str,
    options: &MergeOptions,
) -> Option<Condition> {
    let groups = condition_groups(conditions, options);
    let top = groups.first()?;

    let priority = options.condition_types.as_deref().unwrap_or_default();
    let first = first_condition(top, priority);

    let reason = match first {
        Some(lc) if options.add_source_ref => localize_reason(&lc.condition.reason, lc.source),
        Some(lc) => lc.condition.reason.clone(),
        None => String::new(),
    };
    let message = if options.add_step_counter {
        step_counter_message(&groups, options.step_counter.unwrap_or_default())
    } else {
        first.map(|lc| lc.condition.message.clone()).unwrap_or_default()
    };

    let status = match top.status {
        ConditionStatus::Unknown => ConditionStatus::Unknown,
        status if top.negative_polarity != options.is_negative_polarity(target) => {
            status.inverted()
        }
        status => status,
    };

    Some(Condition::new(target, status, reason, message))
}

fn condition_groups<'a>(
    conditions: &[LocalizedCondition<'a>],
    options: &MergeOptions,
) -> Vec<ConditionGroup<'a>> {
    let mut groups: Vec<ConditionGroup<'a>> = Vec::new();

    for lc in conditions {
        let negative_polarity = options.is_negative_polarity(&lc.condition.r#type);
        let generation = lc.condition.observed_generation;

        match groups.iter_mut().find(|group| {
            group.status == lc.condition.status
                && group.negative_polarity == negative_polarity
                && (!options.latest_generation_only || group.generation == generation)
        }) {
            Some(group) => group.conditions.push(*lc),
            None => groups.push(ConditionGroup {
                status: lc.condition.status,
                negative_polarity,
                generation,
                conditions: vec![*lc],
            }),
        }
    }

    if options.latest_generation_only {
        let latest = groups.iter().map(|g| g.generation).max().unwrap_or_default();
        groups.retain(|g| g.generation == latest);
    }

    groups.sort_by_key(ConditionGroup::merge_priority);

    if let Some(top) = groups.first_mut() {
        top.conditions.sort_by(|a, b| {
            if a.condition.r#type == b.condition.r#type {
                a.source.name.cmp(&b.source.name)
            } else {
                display_order(a.condition, b.condition)
            }
        });
    }

    groups
}

fn first_condition<'g, 'a>(
    top: &'g ConditionGroup<'a>,
    priority: &[String],
) -> Option<&'g LocalizedCondition<'a>> {
    if top.conditions.len() > 1 {
        let prioritized = priority.iter().find_map(|condition_type| {
            top.conditions
                .iter()
                .find(|lc| lc.condition.r#type == *condition_type)
        });
        if prioritized.is_some() {
            return prioritized;
        }
    }
    top.conditions.first()
}

fn localize_reason(reason: &str, source: &SourceRef) -> String {
    if reason.contains('@') {
        return reason.to_string();
    }
    format!("{reason} @ {}/{}", source.kind, source.name)
}

/// `"<n> of <total> completed"`, where n is the number of `True` positive conditions.
fn step_counter_message(groups: &[ConditionGroup<'_>], total: usize) -> String {
    let completed = groups
        .iter()
        .find(|g| g.status == ConditionStatus::True && !g.negative_polarity)
        .map_or(0, |g| g.conditions.len());
    format!("{completed} of {total} completed")
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod merge_tests;
