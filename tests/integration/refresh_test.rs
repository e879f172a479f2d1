//! Refresh, caching, and scope-isolation behavior.

use std::sync::atomic::Ordering;

use livefeed::{
    store_keys, CachedSnapshot, ItemId, Role, Scope, Snapshot, SnapshotStore,
    SNAPSHOT_SCHEMA_VERSION,
};

use crate::helpers::{at, hr_item, hr_scope, TestBed};

#[tokio::test]
async fn test_refresh_twice_yields_identical_snapshots() {
    let bed = TestBed::new(vec![hr_item("1", false, 10), hr_item("2", true, 9)]);

    let first = bed.sync.refresh().await.unwrap();
    let second = bed.sync.refresh().await.unwrap();

    assert_eq!(first.items(), second.items());
    assert_eq!(first.unviewed_count(), second.unviewed_count());
}

#[tokio::test]
async fn test_unviewed_count_matches_filter_after_every_operation() {
    let bed = TestBed::new(vec![
        hr_item("1", false, 10),
        hr_item("2", true, 9),
        hr_item("3", false, 8),
    ]);

    let snapshot = bed.sync.refresh().await.unwrap();
    let derived = snapshot.items().iter().filter(|i| !i.viewed).count();
    assert_eq!(snapshot.unviewed_count(), derived);

    bed.sync.mark_read(&ItemId::from("1")).await.unwrap();
    let snapshot = bed.sync.snapshot();
    let derived = snapshot.items().iter().filter(|i| !i.viewed).count();
    assert_eq!(snapshot.unviewed_count(), derived);
}

#[tokio::test]
async fn test_concrete_hr_scenario() {
    // Server state: item "1" unviewed at T1, item "2" viewed at T0.
    let bed = TestBed::new(vec![hr_item("1", false, 11), hr_item("2", true, 10)]);

    let snapshot = bed.sync.refresh().await.unwrap();
    assert_eq!(snapshot.unviewed_count(), 1);
    let ids: Vec<&str> = snapshot.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["1", "2"]);

    bed.sync.mark_read(&ItemId::from("1")).await.unwrap();
    let snapshot = bed.sync.snapshot();
    assert_eq!(snapshot.unviewed_count(), 0);
    assert!(snapshot.get(&ItemId::from("1")).unwrap().viewed);

    // Server unchanged except the count now confirms 0: the snapshot is
    // stable across the next refresh.
    *bed.transport.server_count.lock().unwrap() = Some(0);
    let after = bed.sync.refresh().await.unwrap();
    assert_eq!(after.unviewed_count(), 0);
    let ids: Vec<&str> = after.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["1", "2"]);
    assert!(after.get(&ItemId::from("1")).unwrap().viewed);
}

#[tokio::test]
async fn test_cached_snapshot_serves_instant_render_then_network_replaces() {
    let bed = TestBed::new(vec![hr_item("1", false, 10)]);

    // First session: refresh persists the snapshot.
    bed.sync.refresh().await.unwrap();
    let persisted = bed.store.entries.lock().unwrap().clone();
    assert_eq!(persisted.len(), 1);

    // Second session over the same store: the cache seeds the state
    // before any network call.
    let bed2 = TestBed::new(vec![hr_item("1", false, 10), hr_item("2", false, 11)]);
    *bed2.store.entries.lock().unwrap() = persisted;
    bed2.sync.init_from_cache().await;
    assert_eq!(bed2.sync.snapshot().len(), 1);
    assert_eq!(bed2.transport.fetch_calls.load(Ordering::SeqCst), 0);

    // The network then replaces the seeded snapshot.
    let snapshot = bed2.sync.refresh().await.unwrap();
    assert_eq!(snapshot.len(), 2);
}

#[tokio::test]
async fn test_failed_refresh_keeps_cached_data_silent() {
    let bed = TestBed::new(vec![hr_item("1", false, 10)]);
    bed.sync.refresh().await.unwrap();

    bed.transport.fail_fetch.store(true, Ordering::SeqCst);
    bed.sync.refresh().await.unwrap_err();

    let state = bed.sync.handle().state();
    assert_eq!(state.snapshot.len(), 1);
    assert!(state.last_error.is_some());
    // Cached data exists, so no retry affordance.
    assert!(!state.show_retry());

    // Recovery clears the soft error.
    bed.transport.fail_fetch.store(false, Ordering::SeqCst);
    bed.sync.refresh().await.unwrap();
    assert!(bed.sync.handle().last_error().is_none());
}

#[tokio::test]
async fn test_stale_cache_version_is_invalidated_wholesale() {
    let bed = TestBed::new(vec![]);
    let key = store_keys::snapshot(&hr_scope().cache_key());

    let snapshot = Snapshot::from_items(vec![hr_item("1", false, 10)], at(11));
    let mut envelope = CachedSnapshot::new(&snapshot, hr_scope().cache_key());
    envelope.version = SNAPSHOT_SCHEMA_VERSION - 1;
    bed.store
        .save(&key, &serde_json::to_string(&envelope).unwrap())
        .await
        .unwrap();

    bed.sync.init_from_cache().await;
    assert!(bed.sync.snapshot().is_empty());
    // The stale entry is gone, not waiting to be misread later.
    assert!(bed.store.entries.lock().unwrap().get(&key).is_none());
}

#[tokio::test]
async fn test_scope_cache_entries_never_cross() {
    let hr_bed = TestBed::new(vec![hr_item("1", false, 10)]);
    hr_bed.sync.refresh().await.unwrap();

    // A manager synchronizer over the same store must not see the HR
    // entry, even though both live side by side.
    let manager_scope = Scope::for_role(Role::Manager)
        .with_company("SOC01")
        .with_service("S7");
    let manager_bed = TestBed::for_scope(manager_scope, vec![]);
    *manager_bed.store.entries.lock().unwrap() =
        hr_bed.store.entries.lock().unwrap().clone();

    manager_bed.sync.init_from_cache().await;
    assert!(manager_bed.sync.snapshot().is_empty());
}

#[tokio::test]
async fn test_corrupt_cache_entry_degrades_to_empty() {
    let bed = TestBed::new(vec![]);
    let key = store_keys::snapshot(&hr_scope().cache_key());
    bed.store.save(&key, "{not valid json").await.unwrap();

    bed.sync.init_from_cache().await;
    assert!(bed.sync.snapshot().is_empty());
    assert!(bed.store.entries.lock().unwrap().get(&key).is_none());
}

#[tokio::test]
async fn test_out_of_scope_items_from_server_are_dropped() {
    let mut foreign = hr_item("99", false, 12);
    foreign.scope.company = Some("SOC02".to_string());
    let bed = TestBed::new(vec![hr_item("1", false, 10), foreign]);

    let snapshot = bed.sync.refresh().await.unwrap();
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.get(&ItemId::from("99")).is_none());
}

#[tokio::test]
async fn test_purge_cache_removes_only_this_scope() {
    let bed = TestBed::new(vec![hr_item("1", false, 10)]);
    bed.sync.refresh().await.unwrap();
    let key = store_keys::snapshot(&hr_scope().cache_key());
    bed.store.save("livefeed:snapshot:other", "x").await.unwrap();

    bed.sync.purge_cache().await.unwrap();
    let entries = bed.store.entries.lock().unwrap();
    assert!(entries.get(&key).is_none());
    assert!(entries.get("livefeed:snapshot:other").is_some());
}
