// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for reconciled resources.
//!
//! All metrics carry the namespace prefix `reconcile_status_` and are labelled with
//! the `kind`, `name` and `namespace` of the resource they describe.
//!
//! # Metrics
//!
//! - `reconcile_status_reconcile_condition` - one gauge per condition type and status,
//!   set to 1 for the current status and 0 for the others
//! - `reconcile_status_suspend_status` - 1 while the resource is suspended
//! - `reconcile_status_reconcile_duration_seconds` - reconcile run durations
//!
//! # Example
//!
//! ```rust,no_run
//! use reconcile_status::metrics::{object_reference, record_condition, record_duration};
//!
//! # fn run<K: kube::Resource<DynamicType = ()>>(obj: &K, ready: &reconcile_status::condition::Condition) {
//! let start = std::time::Instant::now();
//! let reference = object_reference(obj);
//! record_condition(&reference, ready);
//! record_duration(&reference, start);
//! # }
//! ```

use crate::condition::{Condition, ConditionStatus};
use crate::constants::METRICS_NAMESPACE;
use k8s_openapi::api::core::v1::ObjectReference;
use kube::Resource;
use prometheus::{Encoder, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Instant;

/// Shortest reconcile duration bucket, in seconds.
const DURATION_BUCKET_START: f64 = 0.01;

/// Longest reconcile duration bucket, in seconds.
const DURATION_BUCKET_END: f64 = 1800.0;

const DURATION_BUCKET_COUNT: usize = 10;

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Current status of each condition of a resource
///
/// Labels: `kind`, `name`, `namespace`, `type`, `status`
pub static CONDITION_GAUGE: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_reconcile_condition"),
        "The current condition status of a resource reconciliation",
    );
    let gauge = GaugeVec::new(opts, &["kind", "name", "namespace", "type", "status"])
        .expect("condition gauge options are valid");
    METRICS_REGISTRY
        .register(Box::new(gauge.clone()))
        .expect("condition gauge is registered once");
    gauge
});

/// Suspend status of a resource
///
/// Labels: `kind`, `name`, `namespace`
pub static SUSPEND_GAUGE: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_suspend_status"),
        "The current suspend status of a resource",
    );
    let gauge = GaugeVec::new(opts, &["kind", "name", "namespace"])
        .expect("suspend gauge options are valid");
    METRICS_REGISTRY
        .register(Box::new(gauge.clone()))
        .expect("suspend gauge is registered once");
    gauge
});

/// Duration of reconcile runs in seconds
///
/// Ten exponential buckets between 10ms and 30 minutes.
///
/// Labels: `kind`, `name`, `namespace`
pub static DURATION_HISTOGRAM: LazyLock<HistogramVec> = LazyLock::new(|| {
    let factor = (DURATION_BUCKET_END / DURATION_BUCKET_START)
        .powf(1.0 / (DURATION_BUCKET_COUNT - 1) as f64);
    let buckets = prometheus::exponential_buckets(DURATION_BUCKET_START, factor, DURATION_BUCKET_COUNT)
        .expect("duration buckets are valid");
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_reconcile_duration_seconds"),
        "The duration in seconds of a resource reconciliation",
    )
    .buckets(buckets);
    let histogram = HistogramVec::new(opts, &["kind", "name", "namespace"])
        .expect("duration histogram options are valid");
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .expect("duration histogram is registered once");
    histogram
});

/// Reference to `obj` for use as metric labels.
#[must_use]
pub fn object_reference<K: Resource<DynamicType = ()>>(obj: &K) -> ObjectReference {
    obj.object_ref(&())
}

fn labels(reference: &ObjectReference) -> [&str; 3] {
    [
        reference.kind.as_deref().unwrap_or_default(),
        reference.name.as_deref().unwrap_or_default(),
        reference.namespace.as_deref().unwrap_or_default(),
    ]
}

/// Record the status of `condition` for the referenced resource.
pub fn record_condition(reference: &ObjectReference, condition: &Condition) {
    let [kind, name, namespace] = labels(reference);
    for status in ConditionStatus::ALL {
        let value = if status == condition.status { 1.0 } else { 0.0 };
        CONDITION_GAUGE
            .with_label_values(&[kind, name, namespace, condition.r#type.as_str(), status.as_str()])
            .set(value);
    }
}

/// Remove the condition metrics of `condition_type` for the referenced resource.
pub fn delete_condition(reference: &ObjectReference, condition_type: &str) {
    let [kind, name, namespace] = labels(reference);
    for status in ConditionStatus::ALL {
        // Absent series are not an error.
        let _ = CONDITION_GAUGE.remove_label_values(&[
            kind,
            name,
            namespace,
            condition_type,
            status.as_str(),
        ]);
    }
}

/// Record whether the referenced resource is suspended.
pub fn record_suspend(reference: &ObjectReference, suspend: bool) {
    SUSPEND_GAUGE
        .with_label_values(&labels(reference))
        .set(if suspend { 1.0 } else { 0.0 });
}

/// Remove the suspend metric of the referenced resource.
pub fn delete_suspend(reference: &ObjectReference) {
    let _ = SUSPEND_GAUGE.remove_label_values(&labels(reference));
}

/// Record the time elapsed since `start` as a reconcile duration.
pub fn record_duration(reference: &ObjectReference, start: Instant) {
    DURATION_HISTOGRAM
        .with_label_values(&labels(reference))
        .observe(start.elapsed().as_secs_f64());
}

/// Remove the duration metric of the referenced resource.
pub fn delete_duration(reference: &ObjectReference) {
    let _ = DURATION_HISTOGRAM.remove_label_values(&labels(reference));
}

/// Gather all metrics in Prometheus text format.
///
/// # Errors
///
/// Returns an error if metrics cannot be encoded.
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod metrics_tests;
