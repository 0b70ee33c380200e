// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Test custom resource and in-memory store used by the unit tests.

use crate::condition::Condition;
use crate::errors::StoreError;
use crate::impl_status_object;
use crate::object::{ConditionReader, NamespacedName};
use crate::patch::merge_patch;
use crate::patch::{PatchSection, ResourceStore};
use crate::retry::Backoff;
use async_trait::async_trait;
use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(CustomResource, Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "testing.status.io",
    version = "v1",
    kind = "Fake",
    namespaced,
    derive = "PartialEq"
)]
#[kube(status = "FakeStatus")]
#[serde(rename_all = "camelCase")]
pub struct FakeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default)]
    pub suspend: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FakeStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_handled_reconcile_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
}

impl_status_object!(Fake);

/// A `Fake` named `name` in namespace `default` at generation 1.
pub fn fake(name: &str) -> Fake {
    let mut obj = Fake::new(name, FakeSpec::default());
    obj.metadata.namespace = Some("default".to_string());
    obj.metadata.generation = Some(1);
    obj
}

/// A `Fake` carrying the given conditions, stored as-is.
pub fn fake_with_conditions(name: &str, conditions: Vec<Condition>) -> Fake {
    let mut obj = fake(name);
    obj.status = Some(FakeStatus {
        conditions,
        ..FakeStatus::default()
    });
    obj
}

/// A backoff with millisecond waits and no jitter.
pub fn fast_backoff() -> Backoff {
    Backoff::new(
        5,
        Duration::from_millis(1),
        Duration::from_millis(4),
        2.0,
        0.0,
    )
}

#[derive(Default)]
struct MemoryState {
    objects: HashMap<NamespacedName, Fake>,
    version: u64,
    injected_conflicts: u32,
    condition_writes: u32,
    patches: Vec<(PatchSection, Value)>,
}

impl MemoryState {
    fn bump(&mut self, obj: &mut Fake) {
        self.version += 1;
        obj.metadata.resource_version = Some(self.version.to_string());
    }
}

/// [`ResourceStore`] keeping `Fake` objects in memory with resource-version checks.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

fn key_of(obj: &Fake) -> NamespacedName {
    NamespacedName::new(obj.namespace().unwrap_or_default(), obj.name_any())
}

impl MemoryStore {
    /// Store `obj` and return it with its assigned resource version.
    pub fn insert(&self, mut obj: Fake) -> Fake {
        let mut state = self.state.lock().unwrap();
        state.bump(&mut obj);
        state.objects.insert(key_of(&obj), obj.clone());
        obj
    }

    /// The stored revision of `key`.
    pub fn stored(&self, key: &NamespacedName) -> Fake {
        self.state.lock().unwrap().objects[key].clone()
    }

    /// Change the stored object the way another writer would.
    pub fn modify(&self, key: &NamespacedName, f: impl FnOnce(&mut Fake)) {
        let mut state = self.state.lock().unwrap();
        let mut obj = state.objects[key].clone();
        f(&mut obj);
        state.bump(&mut obj);
        state.objects.insert(key.clone(), obj);
    }

    /// Reject the next `n` condition writes with a conflict.
    pub fn fail_next_updates(&self, n: u32) {
        self.state.lock().unwrap().injected_conflicts = n;
    }

    /// Number of condition writes attempted, including rejected ones.
    pub fn condition_writes(&self) -> u32 {
        self.state.lock().unwrap().condition_writes
    }

    /// Merge patches received so far.
    pub fn patches(&self) -> Vec<(PatchSection, Value)> {
        self.state.lock().unwrap().patches.clone()
    }
}

#[async_trait]
impl ResourceStore<Fake> for MemoryStore {
    async fn get(&self, key: &NamespacedName) -> Result<Fake, StoreError> {
        self.state
            .lock()
            .unwrap()
            .objects
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                key: key.to_string(),
            })
    }

    async fn update_conditions(&self, obj: &Fake) -> Result<Fake, StoreError> {
        let key = key_of(obj);
        let mut state = self.state.lock().unwrap();
        state.condition_writes += 1;

        if state.injected_conflicts > 0 {
            state.injected_conflicts -= 1;
            return Err(StoreError::Conflict {
                key: key.to_string(),
            });
        }

        let mut stored = state
            .objects
            .get(&key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                key: key.to_string(),
            })?;
        if stored.metadata.resource_version != obj.metadata.resource_version {
            return Err(StoreError::Conflict {
                key: key.to_string(),
            });
        }

        stored.status.get_or_insert_with(Default::default).conditions = obj.conditions().to_vec();
        state.bump(&mut stored);
        state.objects.insert(key, stored.clone());
        Ok(stored)
    }

    async fn patch(
        &self,
        key: &NamespacedName,
        section: PatchSection,
        patch: &Value,
        _field_owner: Option<&str>,
    ) -> Result<Fake, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.patches.push((section, patch.clone()));

        let stored = state.objects.get(key).ok_or_else(|| StoreError::NotFound {
            key: key.to_string(),
        })?;
        let mut value = serde_json::to_value(stored).map_err(|e| StoreError::Other(e.to_string()))?;
        match section {
            PatchSection::Object => merge_patch::apply(&mut value, patch),
            PatchSection::Status => {
                let status = value
                    .as_object_mut()
                    .ok_or_else(|| StoreError::Other("object is not a map".to_string()))?
                    .entry("status")
                    .or_insert(Value::Null);
                merge_patch::apply(status, patch);
            }
        }

        let mut updated: Fake =
            serde_json::from_value(value).map_err(|e| StoreError::Other(e.to_string()))?;
        state.bump(&mut updated);
        state.objects.insert(key.clone(), updated.clone());
        Ok(updated)
    }
}
