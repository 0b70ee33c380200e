// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `getter.rs`

#[cfg(test)]
mod tests {
    use crate::condition::{now, Condition};
    use crate::conditions::getter::*;
    use crate::testdata::{fake, fake_with_conditions};

    #[test]
    fn test_missing_conditions_are_safe() {
        let obj = fake("empty");

        assert!(get(&obj, "Ready").is_none());
        assert!(!has(&obj, "Ready"));
        assert!(!is_true(&obj, "Ready"));
        assert!(!is_false(&obj, "Ready"));
        assert!(is_unknown(&obj, "Ready"));
        assert_eq!(get_reason(&obj, "Ready"), "");
        assert_eq!(get_message(&obj, "Ready"), "");
        assert_eq!(get_observed_generation(&obj, "Ready"), 0);
        assert!(get_last_transition_time(&obj, "Ready").is_none());
    }

    #[test]
    fn test_reads_existing_condition() {
        let time = now();
        let obj = fake_with_conditions(
            "reads",
            vec![Condition::false_condition("Ready", "Failed", "boom")
                .with_observed_generation(4)
                .with_last_transition_time(time)],
        );

        assert!(has(&obj, "Ready"));
        assert!(is_false(&obj, "Ready"));
        assert!(!is_unknown(&obj, "Ready"));
        assert_eq!(get_reason(&obj, "Ready"), "Failed");
        assert_eq!(get_message(&obj, "Ready"), "boom");
        assert_eq!(get_observed_generation(&obj, "Ready"), 4);
        assert_eq!(get_last_transition_time(&obj, "Ready"), Some(time));
    }

    #[test]
    fn test_has_any_and_has_any_reason() {
        let obj = fake_with_conditions(
            "any",
            vec![Condition::true_condition("Healthy", "Succeeded", "")],
        );

        assert!(has_any(&obj, &["Ready", "Healthy"]));
        assert!(!has_any(&obj, &["Ready", "Stalled"]));
        assert!(!has_any(&obj, &[]));
        assert!(has_any_reason(&obj, "Healthy", &["Failed", "Succeeded"]));
        assert!(!has_any_reason(&obj, "Healthy", &["Failed"]));
        assert!(!has_any_reason(&obj, "Ready", &["Succeeded"]));
    }

    #[test]
    fn test_is_ready_requires_ready_true() {
        let ready = fake_with_conditions("ready", vec![Condition::true_condition("Ready", "Succeeded", "")]);
        let not_ready = fake_with_conditions("not-ready", vec![Condition::false_condition("Ready", "Failed", "")]);

        assert!(is_ready(&ready));
        assert!(!is_ready(&not_ready));
        assert!(!is_ready(&fake("none")));
    }

    #[test]
    fn test_is_ready_false_while_reconciling() {
        let obj = fake_with_conditions(
            "reconciling",
            vec![
                Condition::true_condition("Reconciling", "Progressing", ""),
                Condition::true_condition("Ready", "Succeeded", ""),
            ],
        );

        assert!(is_reconciling(&obj));
        assert!(!is_stalled(&obj));
        assert!(!is_ready(&obj));
    }

    #[test]
    fn test_is_ready_false_while_stalled() {
        let obj = fake_with_conditions(
            "stalled",
            vec![
                Condition::true_condition("Stalled", "InvalidSpec", ""),
                Condition::true_condition("Ready", "Succeeded", ""),
            ],
        );

        assert!(is_stalled(&obj));
        assert!(!is_reconciling(&obj));
        assert!(!is_ready(&obj));
    }

    #[test]
    fn test_reconciling_and_stalled_cancel_each_other() {
        let obj = fake_with_conditions(
            "both",
            vec![
                Condition::true_condition("Stalled", "InvalidSpec", ""),
                Condition::true_condition("Reconciling", "Progressing", ""),
            ],
        );

        assert!(!is_stalled(&obj));
        assert!(!is_reconciling(&obj));
    }

    #[test]
    fn test_false_reconciling_does_not_count() {
        let obj = fake_with_conditions(
            "false-reconciling",
            vec![
                Condition::false_condition("Reconciling", "Succeeded", ""),
                Condition::true_condition("Ready", "Succeeded", ""),
            ],
        );

        assert!(!is_reconciling(&obj));
        assert!(is_ready(&obj));
    }
}
