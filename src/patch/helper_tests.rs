// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `helper.rs`

#[cfg(test)]
mod tests {
    use crate::conditions::{get, mark_false, mark_true, mark_unknown};
    use crate::constants::READY_CONDITION;
    use crate::condition::ConditionStatus;
    use crate::errors::{PatchError, StoreError};
    use crate::object::{NamespacedName, StatusObject};
    use crate::patch::{PatchHelper, PatchOptions, PatchSection};
    use crate::retry::Backoff;
    use crate::testdata::{fake, fast_backoff, Fake, MemoryStore};
    use serde_json::json;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    const HEALTHY: &str = "Healthy";

    fn key(name: &str) -> NamespacedName {
        NamespacedName::new("default", name)
    }

    /// A stored object whose Ready condition is Unknown.
    fn stored_progressing(store: &MemoryStore, name: &str) -> Fake {
        let mut obj = fake(name);
        mark_unknown(&mut obj, READY_CONDITION, "Progressing", "reconciliation in progress");
        store.insert(obj)
    }

    #[tokio::test]
    async fn test_patch_without_changes_does_not_write() {
        let store = MemoryStore::default();
        let mut obj = store.insert(fake("a"));
        let helper = PatchHelper::new(&obj).unwrap();

        helper
            .patch(&store, &mut obj, &PatchOptions::default(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(store.condition_writes(), 0);
        assert!(store.patches().is_empty());
    }

    #[tokio::test]
    async fn test_patch_writes_new_condition() {
        let store = MemoryStore::default();
        let mut obj = store.insert(fake("a"));
        let helper = PatchHelper::new(&obj).unwrap();

        mark_true(&mut obj, READY_CONDITION, "Succeeded", "done");
        helper
            .patch(&store, &mut obj, &PatchOptions::default(), &CancellationToken::new())
            .await
            .unwrap();

        let stored = store.stored(&key("a"));
        let ready = get(&stored, READY_CONDITION).unwrap();
        assert_eq!(ready.status, ConditionStatus::True);
        assert_eq!(ready.reason, "Succeeded");
        assert_eq!(store.condition_writes(), 1);
    }

    #[tokio::test]
    async fn test_patch_keeps_concurrent_change_to_other_condition() {
        let store = MemoryStore::default();
        let mut obj = store.insert(fake("a"));
        let helper = PatchHelper::new(&obj).unwrap();

        store.modify(&key("a"), |o| mark_true(o, HEALTHY, "Checked", ""));
        mark_true(&mut obj, READY_CONDITION, "Succeeded", "done");

        helper
            .patch(&store, &mut obj, &PatchOptions::default(), &CancellationToken::new())
            .await
            .unwrap();

        let stored = store.stored(&key("a"));
        assert!(get(&stored, READY_CONDITION).is_some());
        assert!(get(&stored, HEALTHY).is_some());
    }

    #[tokio::test]
    async fn test_patch_rejects_conflicting_change() {
        let store = MemoryStore::default();
        let mut obj = stored_progressing(&store, "a");
        let helper = PatchHelper::new(&obj).unwrap();

        store.modify(&key("a"), |o| mark_false(o, READY_CONDITION, "Failed", "boom"));
        mark_true(&mut obj, READY_CONDITION, "Succeeded", "done");

        let err = helper
            .patch(&store, &mut obj, &PatchOptions::default(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.is_condition_conflict());
        assert!(err.to_string().contains(READY_CONDITION));

        let stored = store.stored(&key("a"));
        assert_eq!(get(&stored, READY_CONDITION).unwrap().reason, "Failed");
    }

    #[tokio::test]
    async fn test_patch_owned_condition_wins_conflict() {
        let store = MemoryStore::default();
        let mut obj = stored_progressing(&store, "a");
        let helper = PatchHelper::new(&obj).unwrap();

        store.modify(&key("a"), |o| mark_false(o, READY_CONDITION, "Failed", "boom"));
        mark_true(&mut obj, READY_CONDITION, "Succeeded", "done");

        let options = PatchOptions::default().with_owned_conditions([READY_CONDITION]);
        helper
            .patch(&store, &mut obj, &options, &CancellationToken::new())
            .await
            .unwrap();

        let stored = store.stored(&key("a"));
        let ready = get(&stored, READY_CONDITION).unwrap();
        assert_eq!(ready.status, ConditionStatus::True);
        assert_eq!(ready.reason, "Succeeded");
    }

    #[tokio::test]
    async fn test_patch_force_overwrite_wins_conflict() {
        let store = MemoryStore::default();
        let mut obj = stored_progressing(&store, "a");
        let helper = PatchHelper::new(&obj).unwrap();

        store.modify(&key("a"), |o| mark_false(o, READY_CONDITION, "Failed", "boom"));
        mark_true(&mut obj, READY_CONDITION, "Succeeded", "done");

        let options = PatchOptions::default().with_force_overwrite_conditions();
        helper
            .patch(&store, &mut obj, &options, &CancellationToken::new())
            .await
            .unwrap();

        let stored = store.stored(&key("a"));
        assert_eq!(get(&stored, READY_CONDITION).unwrap().reason, "Succeeded");
    }

    #[tokio::test]
    async fn test_patch_retries_store_conflicts() {
        let store = MemoryStore::default();
        let mut obj = store.insert(fake("a"));
        let helper = PatchHelper::new(&obj).unwrap().with_backoff(fast_backoff());

        store.fail_next_updates(2);
        mark_true(&mut obj, READY_CONDITION, "Succeeded", "done");

        helper
            .patch(&store, &mut obj, &PatchOptions::default(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(store.condition_writes(), 3);
        assert!(get(&store.stored(&key("a")), READY_CONDITION).is_some());
    }

    #[tokio::test]
    async fn test_patch_gives_up_after_backoff_steps() {
        let store = MemoryStore::default();
        let mut obj = store.insert(fake("a"));
        let helper = PatchHelper::new(&obj).unwrap().with_backoff(fast_backoff());

        store.fail_next_updates(100);
        mark_true(&mut obj, READY_CONDITION, "Succeeded", "done");

        let err = helper
            .patch(&store, &mut obj, &PatchOptions::default(), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            PatchError::RetriesExhausted { attempts, .. } => assert_eq!(attempts, 5),
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
        assert_eq!(store.condition_writes(), 5);
    }

    #[tokio::test]
    async fn test_patch_stops_when_cancelled() {
        let store = MemoryStore::default();
        let mut obj = store.insert(fake("a"));
        let helper = PatchHelper::new(&obj).unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        mark_true(&mut obj, READY_CONDITION, "Succeeded", "done");

        let err = helper
            .patch(&store, &mut obj, &PatchOptions::default(), &cancel)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(store.condition_writes(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_patch_stops_when_cancelled_during_backoff() {
        let store = MemoryStore::default();
        let mut obj = store.insert(fake("a"));
        let backoff = Backoff::new(5, Duration::from_secs(60), Duration::from_secs(60), 2.0, 0.0);
        let helper = PatchHelper::new(&obj).unwrap().with_backoff(backoff);

        store.fail_next_updates(1);
        mark_true(&mut obj, READY_CONDITION, "Succeeded", "done");

        let cancel = CancellationToken::new();
        let canceller = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            cancel.cancel();
        };
        let opts = PatchOptions::default();
        let (result, ()) = tokio::join!(
            helper.patch(&store, &mut obj, &opts, &cancel),
            canceller
        );

        assert!(result.unwrap_err().is_cancelled());
        assert_eq!(store.condition_writes(), 1);
        assert!(get(&store.stored(&key("a")), READY_CONDITION).is_none());
    }

    #[tokio::test]
    async fn test_first_condition_write_sends_no_section_patches() {
        let store = MemoryStore::default();
        let mut obj = store.insert(fake("a"));
        assert!(obj.status.is_none());
        let helper = PatchHelper::new(&obj).unwrap();

        mark_true(&mut obj, READY_CONDITION, "Succeeded", "done");
        helper
            .patch(&store, &mut obj, &PatchOptions::default(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(store.condition_writes(), 1);
        assert!(store.patches().is_empty());
    }

    #[tokio::test]
    async fn test_patch_sets_status_observed_generation() {
        let store = MemoryStore::default();
        let mut initial = fake("a");
        initial.metadata.generation = Some(3);
        let mut obj = store.insert(initial);
        let helper = PatchHelper::new(&obj).unwrap();

        let options = PatchOptions::default().with_status_observed_generation();
        helper
            .patch(&store, &mut obj, &options, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(obj.status_observed_generation(), 3);
        assert_eq!(store.stored(&key("a")).status_observed_generation(), 3);
        assert_eq!(
            store.patches(),
            vec![(PatchSection::Status, json!({ "observedGeneration": 3 }))]
        );
    }

    #[tokio::test]
    async fn test_section_patches_apply_over_a_newer_revision() {
        let store = MemoryStore::default();
        let mut obj = store.insert(fake("a"));
        let helper = PatchHelper::new(&obj).unwrap();

        store.modify(&key("a"), |o| mark_true(o, HEALTHY, "Checked", ""));
        obj.status.get_or_insert_with(Default::default).artifact = Some("rev-1".to_string());

        helper
            .patch(&store, &mut obj, &PatchOptions::default(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            store.patches(),
            vec![(PatchSection::Status, json!({ "artifact": "rev-1" }))]
        );
        let stored = store.stored(&key("a"));
        assert!(get(&stored, HEALTHY).is_some());
        assert_eq!(stored.status.unwrap().artifact.as_deref(), Some("rev-1"));
    }

    #[tokio::test]
    async fn test_patch_sends_spec_and_status_separately() {
        let store = MemoryStore::default();
        let mut obj = store.insert(fake("a"));
        let helper = PatchHelper::new(&obj).unwrap();

        obj.spec.suspend = true;
        obj.status.get_or_insert_with(Default::default).artifact = Some("rev-1".to_string());
        mark_true(&mut obj, READY_CONDITION, "Succeeded", "done");

        helper
            .patch(&store, &mut obj, &PatchOptions::default(), &CancellationToken::new())
            .await
            .unwrap();

        let patches = store.patches();
        assert_eq!(patches.len(), 2);
        assert_eq!(patches[0].0, PatchSection::Object);
        assert_eq!(patches[0].1, json!({ "spec": { "suspend": true } }));
        assert_eq!(patches[1].0, PatchSection::Status);
        assert_eq!(patches[1].1, json!({ "artifact": "rev-1" }));

        let stored = store.stored(&key("a"));
        assert!(stored.spec.suspend);
        assert_eq!(stored.status.unwrap().artifact.as_deref(), Some("rev-1"));
    }

    #[tokio::test]
    async fn test_patch_returns_single_error_as_is() {
        let store = MemoryStore::default();
        let mut obj = fake("missing");
        let helper = PatchHelper::new(&obj).unwrap();

        mark_true(&mut obj, READY_CONDITION, "Succeeded", "done");
        let err = helper
            .patch(&store, &mut obj, &PatchOptions::default(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PatchError::Store(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_patch_aggregates_errors_from_every_section() {
        let store = MemoryStore::default();
        let mut obj = fake("missing");
        let helper = PatchHelper::new(&obj).unwrap();

        obj.spec.suspend = true;
        obj.status.get_or_insert_with(Default::default).artifact = Some("rev-1".to_string());
        mark_true(&mut obj, READY_CONDITION, "Succeeded", "done");

        let err = helper
            .patch(&store, &mut obj, &PatchOptions::default(), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            PatchError::Aggregate(aggregate) => assert_eq!(aggregate.errors().len(), 3),
            other => panic!("expected Aggregate, got {other:?}"),
        }
    }

    #[test]
    fn test_before_is_the_snapshot() {
        let mut obj = fake("a");
        let helper = PatchHelper::new(&obj).unwrap();
        mark_true(&mut obj, READY_CONDITION, "Succeeded", "done");

        assert!(get(helper.before(), READY_CONDITION).is_none());
    }
}
