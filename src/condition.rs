// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The status condition type.
//!
//! A [`Condition`] is a named, tri-state observation about a resource, carried in the
//! resource's `status.conditions` list. The shape follows the Kubernetes
//! `metav1.Condition` conventions:
//!
//! - `type`: The aspect of the resource being reported (e.g., "Ready", "Stalled")
//! - `status`: "True", "False", or "Unknown"
//! - `reason`: A programmatic identifier (CamelCase)
//! - `message`: A human-readable explanation
//! - `observedGeneration`: The `metadata.generation` the observation was made for
//! - `lastTransitionTime`: RFC3339 timestamp of the last state change
//!
//! # Example
//!
//! ```rust
//! use reconcile_status::condition::{Condition, ConditionStatus};
//!
//! let condition = Condition::false_condition("Ready", "Failed", "connection refused");
//! assert_eq!(condition.status, ConditionStatus::False);
//! assert!(condition.last_transition_time.is_none());
//! ```

use crate::constants::{MAX_CONDITION_MESSAGE_LENGTH, TRIMMED_MESSAGE_SUFFIX};
use chrono::{DateTime, SubsecRound, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tri-state status of a condition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl ConditionStatus {
    /// String form used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::True => "True",
            Self::False => "False",
            Self::Unknown => "Unknown",
        }
    }

    /// Swap `True` and `False`; `Unknown` stays `Unknown`.
    #[must_use]
    pub fn inverted(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Unknown => Self::Unknown,
        }
    }

    /// All three values, in the order metrics report them.
    pub const ALL: [ConditionStatus; 3] = [Self::True, Self::False, Self::Unknown];
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition represents an observation of a resource's current state.
///
/// Conditions are used in status subresources to communicate the state of
/// a resource to users and controllers. The `type` is the identity key: a
/// condition list never holds two entries with the same type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition, e.g. `Ready`, `Reconciling`, `Stalled`.
    pub r#type: String,

    /// Status of the condition: True, False, or Unknown.
    pub status: ConditionStatus,

    /// Brief CamelCase reason for the condition's last transition.
    #[serde(default)]
    pub reason: String,

    /// Human-readable message indicating details about the transition.
    #[serde(default)]
    pub message: String,

    /// The `metadata.generation` this condition was set for.
    #[serde(default)]
    pub observed_generation: i64,

    /// Last time the condition transitioned from one state to another.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,
}

impl Condition {
    /// Create a condition with the given type, status, reason and message.
    ///
    /// The observed generation and transition time are left unset; the setter
    /// fills them in when the condition is written to a resource.
    #[must_use]
    pub fn new(
        condition_type: impl Into<String>,
        status: ConditionStatus,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            r#type: condition_type.into(),
            status,
            reason: reason.into(),
            message: message.into(),
            observed_generation: 0,
            last_transition_time: None,
        }
    }

    /// A condition with `status: True`.
    #[must_use]
    pub fn true_condition(
        condition_type: impl Into<String>,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(condition_type, ConditionStatus::True, reason, message)
    }

    /// A condition with `status: False`.
    #[must_use]
    pub fn false_condition(
        condition_type: impl Into<String>,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(condition_type, ConditionStatus::False, reason, message)
    }

    /// A condition with `status: Unknown`.
    #[must_use]
    pub fn unknown_condition(
        condition_type: impl Into<String>,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(condition_type, ConditionStatus::Unknown, reason, message)
    }

    /// Set the last transition time, returning the condition.
    #[must_use]
    pub fn with_last_transition_time(mut self, time: DateTime<Utc>) -> Self {
        self.last_transition_time = Some(time);
        self
    }

    /// Set the observed generation, returning the condition.
    #[must_use]
    pub fn with_observed_generation(mut self, generation: i64) -> Self {
        self.observed_generation = generation;
        self
    }

    /// Returns `true` if both conditions have the same state.
    ///
    /// The state is the tuple of type, status, reason and message; the transition
    /// time and observed generation are not part of it.
    #[must_use]
    pub fn has_same_state(&self, other: &Condition) -> bool {
        self.r#type == other.r#type
            && self.status == other.status
            && self.reason == other.reason
            && self.message == other.message
    }
}

/// Current time in UTC, truncated to whole seconds.
///
/// Transition times are compared and serialized at second precision.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Trim a condition message to at most `max_length` characters.
///
/// Messages that are cut end with `...`. The limit never goes below the length of
/// the marker itself. Characters are counted as Unicode scalar values, so a
/// multibyte character is never split.
///
/// # Example
///
/// ```rust
/// use reconcile_status::condition::trim_message;
///
/// assert_eq!(trim_message("abcdefgh", 6), "abc...");
/// assert_eq!(trim_message("abc", 6), "abc");
/// ```
#[must_use]
pub fn trim_message(message: &str, max_length: usize) -> String {
    let suffix_len = TRIMMED_MESSAGE_SUFFIX.chars().count();
    let max_length = max_length.max(suffix_len);

    if message.chars().count() <= max_length {
        return message.to_string();
    }

    let mut trimmed: String = message.chars().take(max_length - suffix_len).collect();
    trimmed.push_str(TRIMMED_MESSAGE_SUFFIX);
    trimmed
}

/// Trim a condition message to the standard maximum length.
#[must_use]
pub fn trim_condition_message(message: &str) -> String {
    trim_message(message, MAX_CONDITION_MESSAGE_LENGTH)
}

#[cfg(test)]
#[path = "condition_tests.rs"]
mod condition_tests;
