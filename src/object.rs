// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Capability traits for condition-bearing resources.
//!
//! The condition helpers do not care what a resource *is*, only what it can do:
//!
//! - [`ConditionReader`] - exposes the metadata generation and the condition list
//! - [`ConditionWriter`] - a reader whose condition list can be mutated
//! - [`StatusObject`] - a writer that also carries `status.observedGeneration` and
//!   `status.lastHandledReconcileAt`
//!
//! Any type can opt in by implementing the traits. Kubernetes custom resources whose
//! status struct carries `conditions`, `observed_generation` and
//! `last_handled_reconcile_at` fields can use [`impl_status_object!`](crate::impl_status_object).

use crate::condition::Condition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Read-only access to a resource's generation and conditions.
pub trait ConditionReader {
    /// The resource's current `metadata.generation`.
    fn generation(&self) -> i64;

    /// The resource's `status.conditions`.
    fn conditions(&self) -> &[Condition];

    /// Kind of the resource, used when a merged reason references its source.
    fn object_kind(&self) -> String {
        String::new()
    }

    /// Name of the resource, used when a merged reason references its source.
    fn object_name(&self) -> String {
        String::new()
    }
}

/// Read-write access to a resource's conditions.
pub trait ConditionWriter: ConditionReader {
    /// Mutable access to `status.conditions`.
    fn conditions_mut(&mut self) -> &mut Vec<Condition>;
}

/// Access to the status fields the result finalizer and patch helper maintain.
pub trait StatusObject: ConditionWriter {
    /// The resource's `status.observedGeneration`, or 0 if unset.
    fn status_observed_generation(&self) -> i64;

    /// Set `status.observedGeneration`.
    fn set_status_observed_generation(&mut self, generation: i64);

    /// Value of the reconcile-request annotation, if present.
    fn reconcile_request(&self) -> Option<String>;

    /// Set `status.lastHandledReconcileAt`.
    fn set_last_handled_reconcile_at(&mut self, value: String);
}

/// Namespace and name identifying a resource.
///
/// Cluster-scoped resources use an empty namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespacedName {
    pub namespace: String,
    pub name: String,
}

impl NamespacedName {
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for NamespacedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

/// Implement [`ConditionReader`], [`ConditionWriter`] and [`StatusObject`] for a
/// kube custom resource.
///
/// The resource must have `metadata: ObjectMeta` and `status: Option<S>`, where `S:
/// Default` has the fields `conditions: Vec<Condition>`, `observed_generation:
/// Option<i64>` and `last_handled_reconcile_at: Option<String>`.
///
/// # Example
///
/// ```rust,ignore
/// use reconcile_status::impl_status_object;
///
/// #[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
/// #[kube(group = "example.io", version = "v1", kind = "Widget", namespaced)]
/// #[kube(status = "WidgetStatus")]
/// pub struct WidgetSpec {
///     pub size: i32,
/// }
///
/// impl_status_object!(Widget);
/// ```
#[macro_export]
macro_rules! impl_status_object {
    ($kind:ty) => {
        impl $crate::object::ConditionReader for $kind {
            fn generation(&self) -> i64 {
                self.metadata.generation.unwrap_or_default()
            }

            fn conditions(&self) -> &[$crate::condition::Condition] {
                match &self.status {
                    Some(status) => &status.conditions,
                    None => &[],
                }
            }

            fn object_kind(&self) -> String {
                <$kind as ::kube::Resource>::kind(&()).to_string()
            }

            fn object_name(&self) -> String {
                ::kube::ResourceExt::name_any(self)
            }
        }

        impl $crate::object::ConditionWriter for $kind {
            fn conditions_mut(&mut self) -> &mut Vec<$crate::condition::Condition> {
                &mut self.status.get_or_insert_with(Default::default).conditions
            }
        }

        impl $crate::object::StatusObject for $kind {
            fn status_observed_generation(&self) -> i64 {
                self.status
                    .as_ref()
                    .and_then(|status| status.observed_generation)
                    .unwrap_or_default()
            }

            fn set_status_observed_generation(&mut self, generation: i64) {
                self.status
                    .get_or_insert_with(Default::default)
                    .observed_generation = Some(generation);
            }

            fn reconcile_request(&self) -> Option<String> {
                self.metadata
                    .annotations
                    .as_ref()
                    .and_then(|annotations| {
                        annotations.get($crate::constants::RECONCILE_REQUEST_ANNOTATION)
                    })
                    .cloned()
            }

            fn set_last_handled_reconcile_at(&mut self, value: String) {
                self.status
                    .get_or_insert_with(Default::default)
                    .last_handled_reconcile_at = Some(value);
            }
        }
    };
}
