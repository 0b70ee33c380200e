// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Standard status condition reasons.
//!
//! This module defines constants for condition reasons following Kubernetes conventions.
//! Reasons are programmatic identifiers in CamelCase that explain why a condition has
//! a particular status.
//!
//! # Condition Types and Reasons
//!
//! Every resource carries a `type: Ready` condition. While a reconciliation is running,
//! `type: Reconciling` is present; when the resource cannot make progress without
//! intervention, `type: Stalled` is present instead. Domain-specific conditions are
//! summarized into `Ready`.
//!
//! # Example Status
//!
//! ```yaml
//! status:
//!   observedGeneration: 3
//!   conditions:
//!     - type: Ready
//!       status: "False"
//!       reason: Failed
//!       message: "artifact fetch failed: connection refused"
//!       observedGeneration: 3
//!     - type: FetchFailed
//!       status: "True"
//!       reason: Failed
//!       message: "artifact fetch failed: connection refused"
//!       observedGeneration: 3
//! ```

// ============================================================================
// Result Reasons
// ============================================================================

/// The reconciliation finished and the resource reached its desired state.
///
/// **Usage:**
/// - Used by the result finalizer when it fills in `Ready=True`
pub const REASON_SUCCEEDED: &str = "Succeeded";

/// The reconciliation failed with an error and will be retried.
///
/// **Usage:**
/// - Used by the result finalizer when it turns a reconcile error into `Ready=False`
pub const REASON_FAILED: &str = "Failed";

// ============================================================================
// Progress Reasons
// ============================================================================

/// The reconciliation is in progress.
pub const REASON_PROGRESSING: &str = "Progressing";

/// The reconciliation is in progress after a previous failure.
pub const REASON_PROGRESSING_WITH_RETRY: &str = "ProgressingWithRetry";

/// A dependency of the resource is not ready yet.
pub const REASON_DEPENDENCY_NOT_READY: &str = "DependencyNotReady";

// ============================================================================
// Terminal Reasons
// ============================================================================

/// The resource spec is invalid and reconciliation cannot continue.
///
/// This is normally paired with `Stalled=True`.
pub const REASON_INVALID_SPEC: &str = "InvalidSpec";

/// The resource references a dependency graph that contains a cycle.
///
/// This is normally paired with `Stalled=True`.
pub const REASON_CIRCULAR_DEPENDENCY: &str = "CircularDependency";
