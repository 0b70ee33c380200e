// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common test utilities for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use kube::{CustomResource, ResourceExt};
use reconcile_status::condition::Condition;
use reconcile_status::errors::StoreError;
use reconcile_status::impl_status_object;
use reconcile_status::object::{ConditionReader, NamespacedName};
use reconcile_status::patch::merge_patch;
use reconcile_status::patch::{PatchSection, ResourceStore};
use reconcile_status::retry::Backoff;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub const TEST_NAMESPACE: &str = "integration";

#[derive(CustomResource, Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "integration.status.io",
    version = "v1",
    kind = "Widget",
    namespaced,
    derive = "PartialEq"
)]
#[kube(status = "WidgetStatus")]
#[serde(rename_all = "camelCase")]
pub struct WidgetSpec {
    #[serde(default)]
    pub replicas: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WidgetStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_handled_reconcile_at: Option<String>,
}

impl_status_object!(Widget);

/// A `Widget` in the test namespace at the given generation.
pub fn widget(name: &str, generation: i64) -> Widget {
    let mut obj = Widget::new(name, WidgetSpec::default());
    obj.metadata.namespace = Some(TEST_NAMESPACE.to_string());
    obj.metadata.generation = Some(generation);
    obj
}

pub fn key(name: &str) -> NamespacedName {
    NamespacedName::new(TEST_NAMESPACE, name)
}

/// Millisecond backoff without jitter.
pub fn fast_backoff() -> Backoff {
    Backoff::new(
        5,
        Duration::from_millis(1),
        Duration::from_millis(4),
        2.0,
        0.0,
    )
}

/// In-memory API server stand-in with resource-version checks on condition writes.
#[derive(Default)]
pub struct WidgetStore {
    objects: Mutex<HashMap<NamespacedName, Widget>>,
    version: Mutex<u64>,
}

fn key_of(obj: &Widget) -> NamespacedName {
    NamespacedName::new(obj.namespace().unwrap_or_default(), obj.name_any())
}

impl WidgetStore {
    fn stamp(&self, obj: &mut Widget) {
        let mut version = self.version.lock().unwrap();
        *version += 1;
        obj.metadata.resource_version = Some(version.to_string());
    }

    pub fn create(&self, mut obj: Widget) -> Widget {
        self.stamp(&mut obj);
        self.objects
            .lock()
            .unwrap()
            .insert(key_of(&obj), obj.clone());
        obj
    }

    pub fn stored(&self, key: &NamespacedName) -> Widget {
        self.objects.lock().unwrap()[key].clone()
    }

    /// Apply a change as another controller would.
    pub fn update(&self, key: &NamespacedName, f: impl FnOnce(&mut Widget)) {
        let mut obj = self.stored(key);
        f(&mut obj);
        self.stamp(&mut obj);
        self.objects.lock().unwrap().insert(key.clone(), obj);
    }
}

#[async_trait]
impl ResourceStore<Widget> for WidgetStore {
    async fn get(&self, key: &NamespacedName) -> Result<Widget, StoreError> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                key: key.to_string(),
            })
    }

    async fn update_conditions(&self, obj: &Widget) -> Result<Widget, StoreError> {
        let key = key_of(obj);
        let mut stored = self.get(&key).await?;
        if stored.metadata.resource_version != obj.metadata.resource_version {
            return Err(StoreError::Conflict {
                key: key.to_string(),
            });
        }

        stored.status.get_or_insert_with(Default::default).conditions = obj.conditions().to_vec();
        self.stamp(&mut stored);
        self.objects.lock().unwrap().insert(key, stored.clone());
        Ok(stored)
    }

    async fn patch(
        &self,
        key: &NamespacedName,
        section: PatchSection,
        patch: &Value,
        _field_owner: Option<&str>,
    ) -> Result<Widget, StoreError> {
        let stored = self.get(key).await?;
        let mut value =
            serde_json::to_value(&stored).map_err(|e| StoreError::Other(e.to_string()))?;

        match section {
            PatchSection::Object => merge_patch::apply(&mut value, patch),
            PatchSection::Status => {
                if let Value::Object(fields) = &mut value {
                    merge_patch::apply(fields.entry("status").or_insert(Value::Null), patch);
                }
            }
        }

        let mut updated: Widget =
            serde_json::from_value(value).map_err(|e| StoreError::Other(e.to_string()))?;
        self.stamp(&mut updated);
        self.objects
            .lock()
            .unwrap()
            .insert(key.clone(), updated.clone());
        Ok(updated)
    }
}
