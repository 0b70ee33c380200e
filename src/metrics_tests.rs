// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `metrics.rs`

#[cfg(test)]
mod tests {
    use crate::condition::Condition;
    use crate::metrics::*;
    use crate::testdata::fake;
    use k8s_openapi::api::core::v1::ObjectReference;
    use std::time::Instant;

    fn reference(name: &str) -> ObjectReference {
        object_reference(&fake(name))
    }

    fn condition_value(name: &str, status: &str) -> f64 {
        CONDITION_GAUGE
            .with_label_values(&["Fake", name, "default", "Ready", status])
            .get()
    }

    #[test]
    fn test_object_reference_labels() {
        let reference = reference("metrics-ref");

        assert_eq!(reference.kind.as_deref(), Some("Fake"));
        assert_eq!(reference.name.as_deref(), Some("metrics-ref"));
        assert_eq!(reference.namespace.as_deref(), Some("default"));
    }

    #[test]
    fn test_record_condition_sets_one_status() {
        let reference = reference("metrics-condition");
        record_condition(
            &reference,
            &Condition::false_condition("Ready", "Failed", "boom"),
        );

        assert_eq!(condition_value("metrics-condition", "True"), 0.0);
        assert_eq!(condition_value("metrics-condition", "False"), 1.0);
        assert_eq!(condition_value("metrics-condition", "Unknown"), 0.0);

        record_condition(
            &reference,
            &Condition::true_condition("Ready", "Succeeded", "done"),
        );
        assert_eq!(condition_value("metrics-condition", "True"), 1.0);
        assert_eq!(condition_value("metrics-condition", "False"), 0.0);
    }

    #[test]
    fn test_delete_condition_removes_series() {
        let reference = reference("metrics-delete");
        record_condition(&reference, &Condition::true_condition("Ready", "Succeeded", ""));
        assert!(gather_metrics().unwrap().contains("metrics-delete"));

        delete_condition(&reference, "Ready");
        assert!(!gather_metrics().unwrap().contains("metrics-delete"));

        // Deleting again is harmless.
        delete_condition(&reference, "Ready");
    }

    #[test]
    fn test_record_and_delete_suspend() {
        let reference = reference("metrics-suspend");
        record_suspend(&reference, true);

        let value = SUSPEND_GAUGE
            .with_label_values(&["Fake", "metrics-suspend", "default"])
            .get();
        assert_eq!(value, 1.0);

        delete_suspend(&reference);
        assert!(!gather_metrics().unwrap().contains("metrics-suspend"));
    }

    #[test]
    fn test_record_and_delete_duration() {
        let reference = reference("metrics-duration");
        record_duration(&reference, Instant::now());

        let count = DURATION_HISTOGRAM
            .with_label_values(&["Fake", "metrics-duration", "default"])
            .get_sample_count();
        assert_eq!(count, 1);

        let output = gather_metrics().unwrap();
        assert!(output.contains("reconcile_status_reconcile_duration_seconds"));

        delete_duration(&reference);
        assert!(!gather_metrics().unwrap().contains("metrics-duration"));
    }
}
