// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for condition bookkeeping and status patching.
//!
//! This module provides specialized error types for:
//! - Semantic conflicts when applying a condition patch to a newer revision
//! - Dependency cycles found by the dependency orderer
//! - Contract violations found by the conformance checker
//! - Resource store failures, including optimistic-concurrency conflicts
//! - The patch helper, which combines all of the above
//!
//! A semantic condition conflict ([`ConditionError::PatchConflict`]) and a store
//! conflict ([`StoreError::Conflict`]) are always distinguishable: the first one means
//! another writer changed the same condition in a different direction and is never
//! retried, the second one only means the stored revision moved on.

use crate::object::NamespacedName;
use std::fmt;
use thiserror::Error;

/// Errors raised by the condition diff/patch engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConditionError {
    /// Another writer changed the listed conditions in a way that disagrees with this patch.
    ///
    /// Every conflicting type is listed, not only the first one.
    #[error(
        "patch can not be applied due to conflicts on conditions: {}",
        .condition_types.join(", ")
    )]
    PatchConflict {
        /// Types of the conditions in conflict
        condition_types: Vec<String>,
    },
}

/// Errors raised by the dependency orderer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    /// The dependency graph contains one or more cycles.
    #[error("circular dependencies: {}", format_cycles(.cycles))]
    CircularDependency {
        /// Each cycle, in the order its members were visited
        cycles: Vec<Vec<NamespacedName>>,
    },
}

fn format_cycles(cycles: &[Vec<NamespacedName>]) -> String {
    cycles
        .iter()
        .map(|cycle| {
            let members: Vec<String> = cycle.iter().map(ToString::to_string).collect();
            format!("[{}]", members.join(" "))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Errors raised by the conformance checker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// A check needs the polarity context but the checker was built without it.
    #[error("check {check} requires condition polarity context, but none was provided")]
    MissingContext {
        /// Identifier of the check, e.g. `FAIL0001`
        check: String,
    },

    /// No negative polarity condition types were provided.
    #[error("no negative polarity condition types provided")]
    NoNegativePolarity,
}

/// Many error messages combined into one.
///
/// A single message prints as-is, several print as `[a, b]`. No message is dropped.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{}", format_aggregate(&self.errors))]
pub struct AggregateError {
    errors: Vec<String>,
}

fn format_aggregate(errors: &[String]) -> String {
    match errors {
        [single] => single.clone(),
        many => format!("[{}]", many.join(", ")),
    }
}

impl AggregateError {
    /// Combine the given errors, or return `None` if there are none.
    #[must_use]
    pub fn from_errors<I, E>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = E>,
        E: fmt::Display,
    {
        let errors: Vec<String> = errors.into_iter().map(|e| e.to_string()).collect();
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    /// The individual messages.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// Errors raised by a [`ResourceStore`](crate::patch::ResourceStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The stored revision changed since the object was read (HTTP 409).
    #[error("conflict writing {key}: the object has been modified")]
    Conflict {
        /// Namespace/name of the object
        key: String,
    },

    /// The object does not exist (HTTP 404).
    #[error("{key} not found")]
    NotFound {
        /// Namespace/name of the object
        key: String,
    },

    /// Any other API failure.
    #[error(transparent)]
    Api(#[from] kube::Error),

    /// Store-specific failure.
    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// Returns `true` for optimistic-concurrency conflicts, which are worth retrying.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Conflict { .. } => true,
            Self::Api(kube::Error::Api(response)) => response.code == 409,
            _ => false,
        }
    }
}

/// Errors raised by the [`PatchHelper`](crate::patch::PatchHelper).
#[derive(Error, Debug)]
pub enum PatchError {
    /// The condition patch conflicts with the latest revision. Never retried.
    #[error(transparent)]
    Conditions(#[from] ConditionError),

    /// Every attempt hit a store conflict.
    #[error("failed to patch conditions of {key} after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Namespace/name of the object
        key: String,
        /// Number of attempts made
        attempts: u32,
        /// The last store error
        last: String,
    },

    /// The caller cancelled the patch.
    #[error("patching {key} was cancelled")]
    Cancelled {
        /// Namespace/name of the object
        key: String,
    },

    /// A store failure that is not a conflict.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The object could not be converted to JSON.
    #[error("failed to serialize {key}: {source}")]
    Serialization {
        /// Namespace/name of the object
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Several sections failed.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl PatchError {
    /// Returns `true` if another writer changed a condition in a conflicting way.
    #[must_use]
    pub fn is_condition_conflict(&self) -> bool {
        matches!(self, Self::Conditions(ConditionError::PatchConflict { .. }))
    }

    /// Returns `true` if the store kept rejecting writes because the revision moved on.
    #[must_use]
    pub fn is_store_conflict(&self) -> bool {
        match self {
            Self::RetriesExhausted { .. } => true,
            Self::Store(err) => err.is_conflict(),
            _ => false,
        }
    }

    /// Returns `true` if the patch was cancelled by the caller.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
