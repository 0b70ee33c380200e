// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Options for the merge operations.
//!
//! Both option types deserialize from YAML or JSON so controllers can load them from
//! their configuration, and expose builder methods for use in code:
//!
//! ```rust
//! use reconcile_status::conditions::MergeOptions;
//!
//! let options = MergeOptions::default()
//!     .with_condition_types(["Stalled", "Reconciling", "ArtifactFailed"])
//!     .with_negative_polarity_types(["Stalled", "Reconciling", "ArtifactFailed"]);
//! assert!(options.is_negative_polarity("Stalled"));
//! ```

use serde::{Deserialize, Serialize};

/// Strategies for merging a set of conditions into a single condition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MergeOptions {
    /// Condition types in scope. Unset means every condition except the target.
    ///
    /// The order also defines the priority used to pick the reason and message of the
    /// target condition.
    pub condition_types: Option<Vec<String>>,

    /// Condition types that are "abnormal-true", e.g. `Stalled` or `Reconciling`.
    pub negative_polarity_types: Vec<String>,

    /// Localize the reason with the originating object, e.g. `Failed @ Fake/foo`.
    pub add_source_ref: bool,

    /// Localize the reason only if any in-scope condition has one of these types.
    /// Used by aggregations only.
    pub add_source_ref_if_types: Option<Vec<String>>,

    /// Replace the message with `"<n> of <d> completed"`.
    pub add_step_counter: bool,

    /// Keep the step counter only while every in-scope condition has one of these types.
    pub step_counter_if_only_types: Option<Vec<String>>,

    /// Explicit step counter denominator.
    pub step_counter: Option<usize>,

    /// Only consider the conditions with the highest observed generation.
    pub latest_generation_only: bool,
}

impl MergeOptions {
    #[must_use]
    pub fn with_condition_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.condition_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_negative_polarity_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.negative_polarity_types = types.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_source_ref(mut self) -> Self {
        self.add_source_ref = true;
        self
    }

    #[must_use]
    pub fn with_source_ref_if<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_source_ref_if_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_step_counter(mut self) -> Self {
        self.add_step_counter = true;
        self
    }

    /// Add a step counter only if `value` is `true`, e.g. while the object is not
    /// being deleted.
    #[must_use]
    pub fn with_step_counter_if(mut self, value: bool) -> Self {
        self.add_step_counter = value;
        self
    }

    #[must_use]
    pub fn with_step_counter_if_only<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.step_counter_if_only_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_step_counter_total(mut self, total: usize) -> Self {
        self.step_counter = Some(total);
        self
    }

    #[must_use]
    pub fn with_latest_generation(mut self) -> Self {
        self.latest_generation_only = true;
        self
    }

    /// Returns `true` if the given condition type has negative polarity.
    #[must_use]
    pub fn is_negative_polarity(&self, condition_type: &str) -> bool {
        self.negative_polarity_types
            .iter()
            .any(|t| t == condition_type)
    }

    /// Returns `true` if the given type is in scope.
    #[must_use]
    pub fn in_scope(&self, condition_type: &str) -> bool {
        self.condition_types
            .as_ref()
            .is_none_or(|types| types.iter().any(|t| t == condition_type))
    }
}

/// Fallback used when the mirrored object has no `Ready` condition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorFallback {
    pub value: bool,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
}

/// Options for the mirror operation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MirrorOptions {
    pub fallback: Option<MirrorFallback>,
}

impl MirrorOptions {
    /// Use a `True` or `False` condition with the given reason and message when the
    /// source has no `Ready` condition.
    #[must_use]
    pub fn with_fallback_value(
        mut self,
        value: bool,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.fallback = Some(MirrorFallback {
            value,
            reason: reason.into(),
            message: message.into(),
        });
        self
    }
}
