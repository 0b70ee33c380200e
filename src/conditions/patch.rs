// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Condition diffs and their application to a newer revision.
//!
//! A [`Patch`] records how the conditions of an object changed between a snapshot
//! taken at the start of a reconcile run (`before`) and the in-memory object at the
//! end of it (`after`). Applying the patch to the latest stored revision replays only
//! those changes, so writers that touch different conditions never clobber each
//! other.
//!
//! Each entry is classified against the latest revision before it is applied:
//!
//! | Operation | Latest matches `before` | Latest matches `after` | Anything else |
//! |-----------|-------------------------|------------------------|---------------|
//! | Add       | - (missing: fast-forward) | already applied      | conflict      |
//! | Change    | fast-forward            | already applied        | conflict      |
//! | Remove    | fast-forward            | - (missing: applied)   | conflict      |
//!
//! A conflict becomes an overwrite when the type is owned by the caller or when
//! overwrites are forced.

use crate::condition::Condition;
use crate::conditions::getter::get;
use crate::conditions::setter::{delete, set};
use crate::errors::ConditionError;
use crate::object::{ConditionReader, ConditionWriter};
use serde::{Deserialize, Serialize};

/// Kind of change recorded for a single condition type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchOperation {
    Add,
    Change,
    Remove,
}

/// How a patch entry relates to the latest revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryOutcome {
    /// The latest revision still holds the `before` state; the change applies cleanly.
    FastForward,
    /// The latest revision already holds the `after` state.
    AlreadyApplied,
    /// The latest revision disagrees, but the caller owns the type; `after` wins.
    Overwrite,
    /// The latest revision disagrees and the caller does not own the type.
    Conflict,
}

/// A single change to one condition type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchEntry {
    pub before: Option<Condition>,
    pub after: Option<Condition>,
    pub op: PatchOperation,
}

impl PatchEntry {
    /// The condition type this entry changes.
    #[must_use]
    pub fn condition_type(&self) -> &str {
        self.after
            .as_ref()
            .or(self.before.as_ref())
            .map_or("", |c| c.r#type.as_str())
    }

    /// Classify this entry against `latest` without modifying it.
    #[must_use]
    pub fn outcome<R: ConditionReader + ?Sized>(
        &self,
        latest: &R,
        options: &ApplyOptions,
    ) -> EntryOutcome {
        let current = get(latest, self.condition_type());
        let matches = |expected: &Option<Condition>, current: &Condition| {
            expected
                .as_ref()
                .is_some_and(|expected| expected.has_same_state(current))
        };

        let outcome = match (self.op, current) {
            (PatchOperation::Add, None) => EntryOutcome::FastForward,
            (PatchOperation::Add, Some(c)) if matches(&self.after, c) => EntryOutcome::AlreadyApplied,
            (PatchOperation::Remove, None) => EntryOutcome::AlreadyApplied,
            (PatchOperation::Remove, Some(c)) if matches(&self.before, c) => EntryOutcome::FastForward,
            (PatchOperation::Change, Some(c)) if matches(&self.before, c) => EntryOutcome::FastForward,
            (PatchOperation::Change, Some(c)) if matches(&self.after, c) => EntryOutcome::AlreadyApplied,
            _ => EntryOutcome::Conflict,
        };

        if outcome == EntryOutcome::Conflict && options.owns(self.condition_type()) {
            EntryOutcome::Overwrite
        } else {
            outcome
        }
    }

    fn write<W: ConditionWriter + ?Sized>(&self, latest: &mut W) {
        match (self.op, &self.after) {
            (PatchOperation::Remove, _) | (_, None) => delete(latest, self.condition_type()),
            (_, Some(after)) => set(latest, after.clone()),
        }
    }
}

/// Options for [`Patch::apply`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplyOptions {
    /// Resolve every conflict in favour of this patch.
    pub force_overwrite: bool,
    /// Condition types whose conflicts are resolved in favour of this patch.
    pub owned_conditions: Vec<String>,
}

impl ApplyOptions {
    #[must_use]
    pub fn with_force_overwrite(mut self, force: bool) -> Self {
        self.force_overwrite = force;
        self
    }

    #[must_use]
    pub fn with_owned_conditions<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.owned_conditions = types.into_iter().map(Into::into).collect();
        self
    }

    fn owns(&self, condition_type: &str) -> bool {
        self.force_overwrite || self.owned_conditions.iter().any(|t| t == condition_type)
    }
}

/// The list of condition changes between two snapshots of an object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Patch {
    entries: Vec<PatchEntry>,
}

impl Patch {
    /// Compute the changes that turn the conditions of `before` into those of `after`.
    ///
    /// Adds and changes follow the order of `after`, removals the order of `before`.
    /// Conditions that are equal in both snapshots are not part of the patch.
    #[must_use]
    pub fn new<B, A>(before: &B, after: &A) -> Self
    where
        B: ConditionReader + ?Sized,
        A: ConditionReader + ?Sized,
    {
        let mut entries = Vec::new();

        for target in after.conditions() {
            match get(before, &target.r#type) {
                None => entries.push(PatchEntry {
                    before: None,
                    after: Some(target.clone()),
                    op: PatchOperation::Add,
                }),
                Some(current) if current != target => entries.push(PatchEntry {
                    before: Some(current.clone()),
                    after: Some(target.clone()),
                    op: PatchOperation::Change,
                }),
                Some(_) => {}
            }
        }

        for current in before.conditions() {
            if get(after, &current.r#type).is_none() {
                entries.push(PatchEntry {
                    before: Some(current.clone()),
                    after: None,
                    op: PatchOperation::Remove,
                });
            }
        }

        Self { entries }
    }

    /// Returns `true` if the two snapshots had the same conditions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[PatchEntry] {
        &self.entries
    }

    /// Apply the patch to `latest`.
    ///
    /// Entries are applied in order until the first conflict. The remaining entries are
    /// still classified, so the returned error lists every conflicting type; they are
    /// not written. Changes applied before the first conflict are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError::PatchConflict`] if any entry conflicts with `latest`.
    pub fn apply<W: ConditionWriter + ?Sized>(
        &self,
        latest: &mut W,
        options: &ApplyOptions,
    ) -> Result<(), ConditionError> {
        let mut conflicts: Vec<String> = Vec::new();

        for entry in &self.entries {
            let outcome = entry.outcome(&*latest, options);
            match outcome {
                EntryOutcome::Conflict => conflicts.push(entry.condition_type().to_string()),
                EntryOutcome::FastForward | EntryOutcome::Overwrite if conflicts.is_empty() => {
                    entry.write(latest);
                }
                _ => {}
            }
        }

        if conflicts.is_empty() {
            Ok(())
        } else {
            Err(ConditionError::PatchConflict {
                condition_types: conflicts,
            })
        }
    }
}

#[cfg(test)]
#[path = "patch_tests.rs"]
mod patch_tests;
