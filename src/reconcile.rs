// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Result finalization for reconcile runs.
//!
//! A reconciler sets conditions while it works, but the final status must still be
//! consistent: `Ready` present, `Reconciling` and `Stalled` never both set, `Ready`
//! False whenever the run failed or stalled. [`ResultFinalizer::finalize`] takes the
//! run's result and error and reshapes the conditions so that holds.
//!
//! # Example
//!
//! ```rust,ignore
//! use reconcile_status::reconcile::{success_when_requeue_after, ResultFinalizer, SummarizeConditions};
//!
//! let finalizer = ResultFinalizer::new(
//!     success_when_requeue_after(Duration::from_secs(600)),
//!     "Applied revision",
//!     vec![SummarizeConditions::new(READY_CONDITION)
//!         .summarize([RECONCILING_CONDITION, STALLED_CONDITION, "FetchFailed"])
//!         .negative_polarity([RECONCILING_CONDITION, STALLED_CONDITION, "FetchFailed"])],
//! );
//!
//! let result = reconcile(&mut obj).await;
//! finalizer.finalize(&mut obj, result.requeue, result.error)?;
//! ```

use crate::conditions::{
    delete, get, get_message, is_false, is_ready, is_reconciling, is_stalled, is_true,
    is_unknown, mark_false, mark_true, set_summary, MergeOptions,
};
use crate::constants::{READY_CONDITION, RECONCILING_CONDITION, STALLED_CONDITION};
use crate::object::StatusObject;
use crate::patch::PatchOptions;
use crate::status_reasons::{REASON_FAILED, REASON_SUCCEEDED};
use anyhow::anyhow;
use kube::runtime::controller::Action;
use std::time::Duration;

/// Scheduling outcome of a reconcile run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileResult {
    /// Requeue immediately.
    pub requeue: bool,
    /// Requeue after the given interval.
    pub requeue_after: Option<Duration>,
}

impl ReconcileResult {
    /// Requeue after `interval`.
    #[must_use]
    pub fn requeue_after(interval: Duration) -> Self {
        Self {
            requeue: false,
            requeue_after: Some(interval),
        }
    }

    /// Requeue immediately.
    #[must_use]
    pub fn requeue() -> Self {
        Self {
            requeue: true,
            requeue_after: None,
        }
    }

    /// Returns `true` if no requeue of any kind is requested.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        !self.requeue && self.requeue_after.is_none_or(|after| after.is_zero())
    }
}

impl From<ReconcileResult> for Action {
    fn from(result: ReconcileResult) -> Self {
        match result.requeue_after {
            Some(after) if !after.is_zero() => Action::requeue(after),
            _ if result.requeue => Action::requeue(Duration::ZERO),
            _ => Action::await_change(),
        }
    }
}

/// Decides whether a result and error amount to a successful run.
pub type IsResultSuccess = Box<dyn Fn(&ReconcileResult, Option<&anyhow::Error>) -> bool + Send + Sync>;

/// Success predicate for reconcilers that requeue at a fixed interval when they succeed.
///
/// Any error, immediate requeue or other interval is a failure.
#[must_use]
pub fn success_when_requeue_after(interval: Duration) -> IsResultSuccess {
    Box::new(move |result, error| {
        error.is_none() && !result.requeue && result.requeue_after == Some(interval)
    })
}

/// Success predicate for reconcilers that do not requeue when they succeed.
#[must_use]
pub fn success_without_requeue() -> IsResultSuccess {
    Box::new(|result, error| error.is_none() && result.is_zero())
}

/// A condition to summarize from other conditions when finalizing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SummarizeConditions {
    /// The condition to write, e.g. `Ready`.
    pub target: String,
    /// Conditions the reconciler owns for this target.
    pub owned: Vec<String>,
    /// Conditions the target is summarized from.
    pub summarize: Vec<String>,
    /// Conditions in `summarize` with negative polarity.
    pub negative_polarity: Vec<String>,
}

fn strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

impl SummarizeConditions {
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn owned<I: IntoIterator<Item = S>, S: Into<String>>(mut self, types: I) -> Self {
        self.owned = strings(types);
        self
    }

    #[must_use]
    pub fn summarize<I: IntoIterator<Item = S>, S: Into<String>>(mut self, types: I) -> Self {
        self.summarize = strings(types);
        self
    }

    #[must_use]
    pub fn negative_polarity<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        types: I,
    ) -> Self {
        self.negative_polarity = strings(types);
        self
    }
}

/// Brings an object's conditions into a consistent final state after a reconcile run.
pub struct ResultFinalizer {
    is_success: IsResultSuccess,
    ready_success_message: String,
    summaries: Vec<SummarizeConditions>,
}

impl ResultFinalizer {
    #[must_use]
    pub fn new(
        is_success: IsResultSuccess,
        ready_success_message: impl Into<String>,
        summaries: Vec<SummarizeConditions>,
    ) -> Self {
        Self {
            is_success,
            ready_success_message: ready_success_message.into(),
            summaries,
        }
    }

    /// Reshape the conditions of `obj` for the given run outcome.
    ///
    /// Returns the reconcile error, or a new error carrying Ready's message when a
    /// run that looked successful still left `Ready=False`.
    ///
    /// # Errors
    ///
    /// Returns `error` unchanged when it is present.
    pub fn finalize<K: StatusObject>(
        &self,
        obj: &mut K,
        result: ReconcileResult,
        error: Option<anyhow::Error>,
    ) -> anyhow::Result<()> {
        let mut error = error;
        let success = (self.is_success)(&result, error.as_ref());

        // A failed run will be retried, so it is not stalled.
        if error.is_some() {
            delete(obj, STALLED_CONDITION);
        }

        // A zero result is also how a stalled run ends, even when the reconciler
        // counts it as success.
        if !success || result.is_zero() {
            // An explicit requeue means the reconciler expects progress.
            if !result.is_zero() && !(self.is_success)(&result, None) {
                delete(obj, STALLED_CONDITION);
            }

            let overwrite_ready =
                is_unknown(obj, READY_CONDITION) || is_true(obj, READY_CONDITION);
            if is_true(obj, STALLED_CONDITION) && overwrite_ready {
                if let Some(stalled) = get(obj, STALLED_CONDITION).cloned() {
                    mark_false(obj, READY_CONDITION, &stalled.reason, &stalled.message);
                }
            }
        }

        if success || is_true(obj, STALLED_CONDITION) {
            delete(obj, RECONCILING_CONDITION);
        }

        // Ready=False set by the reconciler is kept.
        if let Some(err) = &error {
            if is_unknown(obj, READY_CONDITION) || is_ready(obj) {
                mark_false(obj, READY_CONDITION, REASON_FAILED, &err.to_string());
            }
        }

        for summary in &self.summaries {
            let options = MergeOptions::default()
                .with_condition_types(summary.summarize.iter().cloned())
                .with_negative_polarity_types(summary.negative_polarity.iter().cloned());
            set_summary(obj, &summary.target, &options);
        }

        if success
            && !is_unknown(obj, READY_CONDITION)
            && is_false(obj, READY_CONDITION)
            && !is_stalled(obj)
        {
            error = Some(anyhow!(get_message(obj, READY_CONDITION)));
        }

        // An immediate requeue with no prior condition work leaves Ready unset here.
        if is_unknown(obj, READY_CONDITION)
            && (self.is_success)(&result, error.as_ref())
            && !is_reconciling(obj)
            && !is_stalled(obj)
        {
            mark_true(obj, READY_CONDITION, REASON_SUCCEEDED, &self.ready_success_message);
        }

        if let Some(requested_at) = obj.reconcile_request() {
            obj.set_last_handled_reconcile_at(requested_at);
        }

        match error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Extend `options` with the owned conditions and field owner, and with the status
/// observed generation when the object is stalled or ready.
///
/// The object's conditions must already be finalized.
#[must_use]
pub fn add_patch_options<K: StatusObject + ?Sized>(
    obj: &K,
    options: PatchOptions,
    owned_conditions: &[&str],
    field_owner: &str,
) -> PatchOptions {
    let mut options = options
        .with_owned_conditions(owned_conditions.iter().copied())
        .with_field_owner(field_owner);

    if field_owner.is_empty() {
        options.field_owner = None;
    }
    if is_stalled(obj) || is_ready(obj) {
        options = options.with_status_observed_generation();
    }
    options
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod reconcile_tests;
