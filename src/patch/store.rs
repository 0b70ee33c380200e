// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Resource store abstraction used by the patch helper.
//!
//! The helper never talks to the API server directly. It reads and writes through a
//! [`ResourceStore`], which must report optimistic-concurrency failures as
//! [`StoreError::Conflict`] so they can be told apart from every other failure.
//! [`KubeStore`] implements the trait on top of a [`kube::Api`].

use crate::constants::{FIELD_CONDITIONS, FIELD_METADATA, FIELD_RESOURCE_VERSION, FIELD_STATUS};
use crate::errors::StoreError;
use crate::object::{ConditionReader, NamespacedName};
use async_trait::async_trait;
use kube::api::{Api, Patch as KubePatch, PatchParams};
use kube::{Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::Debug;
use tracing::debug;

/// Part of an object a merge patch is sent to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchSection {
    /// Metadata, spec and any other top-level field except `status`.
    Object,
    /// The status subresource.
    Status,
}

/// Read and write access to stored objects of type `K`.
#[async_trait]
pub trait ResourceStore<K>: Send + Sync
where
    K: Send + Sync,
{
    /// Fetch the latest stored revision of the object.
    async fn get(&self, key: &NamespacedName) -> Result<K, StoreError>;

    /// Replace `status.conditions` of the stored object with those of `obj`.
    ///
    /// The write must only succeed if the stored object still has the resource version
    /// carried by `obj`; otherwise it fails with [`StoreError::Conflict`].
    async fn update_conditions(&self, obj: &K) -> Result<K, StoreError>;

    /// Send a JSON merge patch to one section of the object.
    ///
    /// For [`PatchSection::Status`] the patch is relative to `status`, not to the
    /// object root.
    ///
    /// The patch carries no resource version, so it applies to whatever revision is
    /// stored and the last writer wins. Only [`ResourceStore::update_conditions`] is
    /// a compare-and-swap.
    async fn patch(
        &self,
        key: &NamespacedName,
        section: PatchSection,
        merge_patch: &Value,
        field_owner: Option<&str>,
    ) -> Result<K, StoreError>;
}

/// [`ResourceStore`] backed by the Kubernetes API.
///
/// Objects are addressed by name within the scope of the wrapped [`Api`]; build it
/// with `Api::namespaced` for namespaced resources or `Api::all` for cluster-scoped
/// ones.
pub struct KubeStore<K> {
    api: Api<K>,
}

impl<K> KubeStore<K> {
    #[must_use]
    pub fn new(api: Api<K>) -> Self {
        Self { api }
    }
}

/// Map a kube error to a store error, keeping conflicts and missing objects apart.
fn map_kube_error(key: &NamespacedName, err: kube::Error) -> StoreError {
    match &err {
        kube::Error::Api(response) if response.code == 409 => StoreError::Conflict {
            key: key.to_string(),
        },
        kube::Error::Api(response) if response.code == 404 => StoreError::NotFound {
            key: key.to_string(),
        },
        _ => StoreError::Api(err),
    }
}

fn patch_params(field_owner: Option<&str>) -> PatchParams {
    PatchParams {
        field_manager: field_owner.map(ToString::to_string),
        ..PatchParams::default()
    }
}

#[async_trait]
impl<K> ResourceStore<K> for KubeStore<K>
where
    K: Resource + ConditionReader + Clone + Debug + Serialize + DeserializeOwned + Send + Sync,
{
    async fn get(&self, key: &NamespacedName) -> Result<K, StoreError> {
        self.api
            .get(&key.name)
            .await
            .map_err(|e| map_kube_error(key, e))
    }

    async fn update_conditions(&self, obj: &K) -> Result<K, StoreError> {
        let key = NamespacedName::new(obj.namespace().unwrap_or_default(), obj.name_any());

        // A merge patch carrying the resource version is rejected with 409 when the
        // stored object has moved on.
        let body = json!({
            FIELD_METADATA: { FIELD_RESOURCE_VERSION: obj.resource_version() },
            FIELD_STATUS: { FIELD_CONDITIONS: obj.conditions() },
        });

        debug!(
            object = %key,
            resource_version = ?obj.resource_version(),
            "Writing conditions"
        );

        self.api
            .patch_status(&key.name, &PatchParams::default(), &KubePatch::Merge(&body))
            .await
            .map_err(|e| map_kube_error(&key, e))
    }

    async fn patch(
        &self,
        key: &NamespacedName,
        section: PatchSection,
        merge_patch: &Value,
        field_owner: Option<&str>,
    ) -> Result<K, StoreError> {
        let params = patch_params(field_owner);

        let result = match section {
            PatchSection::Object => {
                self.api
                    .patch(&key.name, &params, &KubePatch::Merge(merge_patch))
                    .await
            }
            PatchSection::Status => {
                let body = json!({ FIELD_STATUS: merge_patch });
                self.api
                    .patch_status(&key.name, &params, &KubePatch::Merge(&body))
                    .await
            }
        };

        result.map_err(|e| map_kube_error(key, e))
    }
}
