// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the reconcile-status library.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Standard Condition Types
// ============================================================================

/// Condition type for the overall readiness of a resource.
///
/// `Ready` has positive polarity: `True` is the normal state.
pub const READY_CONDITION: &str = "Ready";

/// Condition type signalling that a reconciliation is in progress.
///
/// `Reconciling` has negative polarity and is mutually exclusive with `Stalled`.
pub const RECONCILING_CONDITION: &str = "Reconciling";

/// Condition type signalling that reconciliation cannot make progress without
/// outside intervention.
///
/// `Stalled` has negative polarity and is mutually exclusive with `Reconciling`.
pub const STALLED_CONDITION: &str = "Stalled";

/// Well-known condition types that always sort first, in this order.
///
/// The position in this table is the display weight used when sorting a
/// condition list.
pub const CONDITION_DISPLAY_ORDER: [&str; 3] =
    [STALLED_CONDITION, RECONCILING_CONDITION, READY_CONDITION];

// ============================================================================
// Condition Message Limits
// ============================================================================

/// Maximum number of characters accepted in a condition message.
pub const MAX_CONDITION_MESSAGE_LENGTH: usize = 32768;

/// Marker appended to a condition message that was truncated.
pub const TRIMMED_MESSAGE_SUFFIX: &str = "...";

// ============================================================================
// Annotations
// ============================================================================

/// Annotation used by clients to request an out-of-band reconciliation.
///
/// The value is opaque; the result finalizer copies it into
/// `status.lastHandledReconcileAt` once the request has been handled.
pub const RECONCILE_REQUEST_ANNOTATION: &str = "reconcile.status.io/requestedAt";

// ============================================================================
// Condition Patch Retry Constants
// ============================================================================

/// Number of attempts the patch helper makes to write conditions when the
/// store reports a write conflict.
pub const CONDITIONS_PATCH_STEPS: u32 = 5;

/// Initial interval between condition patch attempts (100ms).
pub const CONDITIONS_PATCH_INITIAL_INTERVAL_MILLIS: u64 = 100;

/// Maximum interval between condition patch attempts (10 seconds).
pub const CONDITIONS_PATCH_MAX_INTERVAL_SECS: u64 = 10;

/// Backoff multiplier between condition patch attempts.
pub const CONDITIONS_PATCH_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Jitter factor for condition patch attempts (full jitter, up to +100%).
pub const CONDITIONS_PATCH_JITTER: f64 = 1.0;

// ============================================================================
// Status Field Names
// ============================================================================

/// Top-level object field holding metadata.
pub const FIELD_METADATA: &str = "metadata";

/// Top-level object field holding the observed state.
pub const FIELD_STATUS: &str = "status";

/// Status field holding the condition list.
pub const FIELD_CONDITIONS: &str = "conditions";

/// Metadata field holding the concurrency token.
pub const FIELD_RESOURCE_VERSION: &str = "resourceVersion";

// ============================================================================
// Metrics Constants
// ============================================================================

/// Namespace prefix for all metrics (prometheus-safe)
pub const METRICS_NAMESPACE: &str = "reconcile_status";
