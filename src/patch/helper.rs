// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Patch helper that persists the changes a reconcile run made to an object.
//!
//! [`PatchHelper::new`] snapshots the object before the reconciler starts changing it.
//! [`PatchHelper::patch`] compares the snapshot with the modified object and writes
//! only what changed, in three steps:
//!
//! 1. **Conditions** - the condition diff is applied to the latest stored revision and
//!    written with a compare-and-swap. Store conflicts are retried with jittered
//!    exponential backoff; semantic conflicts with another writer are not.
//! 2. **Object** - a merge patch of metadata, spec and other top-level fields.
//! 3. **Status** - a merge patch of the status without its conditions.
//!
//! Conditions go first: they carry the resource version for the compare-and-swap, so
//! writing them before the other sections avoids invalidating an in-flight attempt.
//!
//! # Example
//!
//! ```rust,ignore
//! let helper = PatchHelper::new(&obj)?;
//!
//! mark_reconciling(&mut obj, "Progressing", "reconciliation in progress");
//! // ...reconcile...
//!
//! let options = PatchOptions::default()
//!     .with_owned_conditions(["Ready", "Reconciling", "Stalled"]);
//! helper.patch(&store, &mut obj, &options, &cancel).await?;
//! ```

use crate::conditions::Patch;
use crate::constants::{FIELD_CONDITIONS, FIELD_STATUS};
use crate::errors::{AggregateError, PatchError};
use crate::object::{ConditionReader, NamespacedName, StatusObject};
use crate::patch::merge_patch;
use crate::patch::options::PatchOptions;
use crate::patch::store::{PatchSection, ResourceStore};
use crate::retry::{conditions_backoff, Backoff};
use kube::{Resource, ResourceExt};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Computes and sends the patches for one object.
pub struct PatchHelper<K> {
    before: K,
    before_json: Value,
    backoff: Backoff,
}

/// Namespace and name of a kube object.
pub(crate) fn object_key<K: Resource>(obj: &K) -> NamespacedName {
    NamespacedName::new(obj.namespace().unwrap_or_default(), obj.name_any())
}

fn to_json<K: Serialize>(key: &NamespacedName, obj: &K) -> Result<Value, PatchError> {
    serde_json::to_value(obj).map_err(|source| PatchError::Serialization {
        key: key.to_string(),
        source,
    })
}

/// The part of an object's JSON that belongs to `section`.
///
/// Conditions are excluded from the status section; they are patched on their own.
/// A missing status reads as an empty one.
fn section_of(value: &Value, section: PatchSection) -> Value {
    let Value::Object(fields) = value else {
        return Value::Null;
    };

    match section {
        PatchSection::Object => {
            let mut fields = fields.clone();
            fields.remove(FIELD_STATUS);
            Value::Object(fields)
        }
        PatchSection::Status => match fields.get(FIELD_STATUS) {
            Some(Value::Object(status)) => {
                let mut status = status.clone();
                status.remove(FIELD_CONDITIONS);
                Value::Object(status)
            }
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(other) => other.clone(),
        },
    }
}

impl<K> PatchHelper<K>
where
    K: StatusObject + Resource + Serialize + Clone + Send + Sync,
{
    /// Snapshot `obj` as the base of the patch.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::Serialization`] if the object cannot be converted to JSON.
    pub fn new(obj: &K) -> Result<Self, PatchError> {
        let before_json = to_json(&object_key(obj), obj)?;
        Ok(Self {
            before: obj.clone(),
            before_json,
            backoff: conditions_backoff(),
        })
    }

    /// Use a custom backoff for condition conflicts, e.g. a seeded one in tests.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// The snapshot taken when the helper was created.
    #[must_use]
    pub fn before(&self) -> &K {
        &self.before
    }

    /// Persist the changes between the snapshot and `obj`.
    ///
    /// Every section is attempted even if an earlier one fails. A single failure is
    /// returned as-is, several are combined into [`PatchError::Aggregate`].
    ///
    /// # Errors
    ///
    /// - [`PatchError::Conditions`] if another writer changed a condition this run
    ///   also changed and the type is not owned
    /// - [`PatchError::RetriesExhausted`] if the store kept reporting conflicts
    /// - [`PatchError::Cancelled`] if `cancel` fired before the conditions were written
    /// - [`PatchError::Store`] for any other store failure
    pub async fn patch<S>(
        &self,
        store: &S,
        obj: &mut K,
        options: &PatchOptions,
        cancel: &CancellationToken,
    ) -> Result<(), PatchError>
    where
        S: ResourceStore<K> + ?Sized,
    {
        let key = object_key(&*obj);

        if options.include_status_observed_generation {
            let generation = ConditionReader::generation(&*obj);
            obj.set_status_observed_generation(generation);
        }

        let after_json = to_json(&key, &*obj)?;
        let field_owner = options.field_owner.as_deref();

        let mut errors: Vec<PatchError> = Vec::new();

        if let Err(err) = self.patch_conditions(store, &key, obj, options, cancel).await {
            errors.push(err);
        }

        for section in [PatchSection::Object, PatchSection::Status] {
            let Some(diff) = merge_patch::diff(
                &section_of(&self.before_json, section),
                &section_of(&after_json, section),
            ) else {
                continue;
            };

            debug!(object = %key, ?section, "Patching object");
            if let Err(err) = store.patch(&key, section, &diff, field_owner).await {
                error!(object = %key, ?section, error = %err, "Failed to patch object");
                errors.push(err.into());
            }
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(PatchError::Aggregate(
                AggregateError::from_errors(errors).unwrap_or_default(),
            )),
        }
    }

    /// Apply the condition diff to the latest revision, retrying on store conflicts.
    async fn patch_conditions<S>(
        &self,
        store: &S,
        key: &NamespacedName,
        obj: &K,
        options: &PatchOptions,
        cancel: &CancellationToken,
    ) -> Result<(), PatchError>
    where
        S: ResourceStore<K> + ?Sized,
    {
        let diff = Patch::new(&self.before, obj);
        if diff.is_empty() {
            return Ok(());
        }

        let apply_options = options.apply_options();
        let mut backoff = self.backoff.clone();
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(PatchError::Cancelled {
                    key: key.to_string(),
                });
            }
            attempt += 1;

            let mut latest = store.get(key).await?;
            diff.apply(&mut latest, &apply_options)?;

            match store.update_conditions(&latest).await {
                Ok(_) => {
                    debug!(
                        object = %key,
                        attempt = attempt,
                        changes = diff.entries().len(),
                        "Patched conditions"
                    );
                    return Ok(());
                }
                Err(err) if err.is_conflict() => {
                    let Some(wait) = backoff.next_backoff() else {
                        error!(
                            object = %key,
                            attempt = attempt,
                            error = %err,
                            "Condition patch conflicts exhausted the backoff, giving up"
                        );
                        return Err(PatchError::RetriesExhausted {
                            key: key.to_string(),
                            attempts: attempt,
                            last: err.to_string(),
                        });
                    };

                    warn!(
                        object = %key,
                        attempt = attempt,
                        retry_after = ?wait,
                        "Conflict writing conditions, will retry against the latest revision"
                    );

                    tokio::select! {
                        () = cancel.cancelled() => {
                            return Err(PatchError::Cancelled { key: key.to_string() });
                        }
                        () = tokio::time::sleep(wait) => {}
                    }
                }
                Err(err) => {
                    error!(object = %key, error = %err, "Failed to write conditions");
                    return Err(err.into());
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "helper_tests.rs"]
mod helper_tests;
