// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Patching the same object several times during one reconcile run.

use crate::errors::PatchError;
use crate::object::StatusObject;
use crate::patch::helper::{object_key, PatchHelper};
use crate::patch::options::PatchOptions;
use crate::patch::store::ResourceStore;
use crate::retry::Backoff;
use kube::Resource;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Remembers the last successfully patched state of an object and uses it as the base
/// of the next patch.
///
/// A plain [`PatchHelper`] diffs against the snapshot it was created with, so a second
/// patch from the same helper would resend the first one's changes. The serial
/// patcher moves its base forward after every successful patch instead.
pub struct SerialPatcher<K> {
    before: K,
    backoff: Option<Backoff>,
}

impl<K> SerialPatcher<K>
where
    K: StatusObject + Resource + Serialize + Clone + Send + Sync,
{
    /// Use `obj` as the initial base.
    #[must_use]
    pub fn new(obj: &K) -> Self {
        Self {
            before: obj.clone(),
            backoff: None,
        }
    }

    /// Use a custom backoff for condition conflicts.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = Some(backoff);
        self
    }

    /// Patch the changes between the current base and `obj`, then make `obj` the new
    /// base. The base is left unchanged if the patch fails.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`PatchHelper::patch`].
    pub async fn patch<S>(
        &mut self,
        store: &S,
        obj: &mut K,
        options: &PatchOptions,
        cancel: &CancellationToken,
    ) -> Result<(), PatchError>
    where
        S: ResourceStore<K> + ?Sized,
    {
        let mut helper = PatchHelper::new(&self.before)?;
        if let Some(backoff) = &self.backoff {
            helper = helper.with_backoff(backoff.clone());
        }

        helper.patch(store, obj, options, cancel).await?;

        debug!(object = %object_key(&*obj), "Advanced serial patch base");
        self.before = obj.clone();
        Ok(())
    }
}

#[cfg(test)]
#[path = "serial_tests.rs"]
mod serial_tests;
