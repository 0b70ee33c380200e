// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # reconcile-status - Status Conditions for Kubernetes Controllers
//!
//! reconcile-status is the shared status layer of a Kubernetes controller. It merges
//! many independent condition observations into a few standard summary conditions and
//! persists condition changes safely while other writers race to update the same
//! object.
//!
//! ## Overview
//!
//! - A condition algebra: setters that keep transition times honest, and summary,
//!   aggregate and mirror merges with deterministic tie-breaking
//! - Condition diffs that apply cleanly to a newer stored revision, with ownership
//!   rules for conflicting writers
//! - A patch helper that retries store conflicts with jittered backoff
//! - A result finalizer that turns a reconcile outcome into a consistent
//!   `Ready`/`Reconciling`/`Stalled` status
//! - A dependency orderer that detects cycles
//!
//! ## Modules
//!
//! - [`condition`] - The [`Condition`](condition::Condition) type
//! - [`object`] - Capability traits for condition-bearing resources
//! - [`conditions`] - Getters, setters, merges and condition diffs
//! - [`patch`] - Persisting changes through a [`ResourceStore`](patch::ResourceStore)
//! - [`reconcile`] - The [`ResultFinalizer`](reconcile::ResultFinalizer)
//! - [`dependency`] - Dependency ordering
//! - [`check`] - Conformance checks for status conditions
//! - [`metrics`] - Prometheus metrics for reconciled resources
//! - [`logging`] - Tracing subscriber setup
//!
//! ## Example
//!
//! ```rust,no_run
//! use kube::CustomResource;
//! use reconcile_status::condition::{Condition, ConditionStatus};
//! use reconcile_status::conditions::{get, mark_true};
//! use reconcile_status::impl_status_object;
//! use schemars::JsonSchema;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
//! #[kube(group = "example.io", version = "v1", kind = "Widget", namespaced)]
//! #[kube(status = "WidgetStatus")]
//! pub struct WidgetSpec {
//!     pub size: i32,
//! }
//!
//! #[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
//! #[serde(rename_all = "camelCase")]
//! pub struct WidgetStatus {
//!     pub observed_generation: Option<i64>,
//!     pub conditions: Vec<Condition>,
//!     pub last_handled_reconcile_at: Option<String>,
//! }
//!
//! impl_status_object!(Widget);
//!
//! let mut widget = Widget::new("w", WidgetSpec { size: 1 });
//! mark_true(&mut widget, "Ready", "Succeeded", "widget is ready");
//! assert_eq!(get(&widget, "Ready").map(|c| c.status), Some(ConditionStatus::True));
//! ```

pub mod check;
pub mod condition;
pub mod conditions;
pub mod constants;
pub mod dependency;
pub mod errors;
pub mod logging;
pub mod metrics;
pub mod object;
pub mod patch;
pub mod reconcile;
pub mod retry;
pub mod status_reasons;

#[cfg(test)]
mod testdata;
