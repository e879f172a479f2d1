//! Push-channel behavior: merge correctness, hint fallback, scope
//! isolation on a shared channel, and non-fatal push failure.

use std::sync::atomic::Ordering;
use std::time::Duration;

use livefeed::{ItemId, PushEvent, Role, ScopeTag};

use crate::helpers::{hr_item, TestBed};

/// Long enough that the poller only performs its immediate first
/// refresh during a test.
const IDLE_POLL: Duration = Duration::from_secs(3600);

#[tokio::test]
async fn test_pushed_item_merges_newest_first_with_count_increment() {
    // Snapshot [A(unread), B(read)]; push C(unread) → [C, A, B], +1.
    let bed = TestBed::new(vec![hr_item("A", false, 10), hr_item("B", true, 9)]);
    bed.start(IDLE_POLL);
    bed.wait_for_fetches(1).await;
    assert_eq!(bed.sync.snapshot().unviewed_count(), 1);

    assert!(bed.push.emit(PushEvent::Item(hr_item("C", false, 11))).await);
    bed.settle().await;

    let snapshot = bed.sync.snapshot();
    let ids: Vec<&str> = snapshot.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["C", "A", "B"]);
    assert_eq!(snapshot.unviewed_count(), 2);
    // The merge did not cost a fetch.
    assert_eq!(bed.transport.fetch_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_pushed_duplicate_id_replaces_without_count_drift() {
    let bed = TestBed::new(vec![hr_item("A", false, 10)]);
    bed.start(IDLE_POLL);
    bed.wait_for_fetches(1).await;

    assert!(bed.push.emit(PushEvent::Item(hr_item("A", false, 10))).await);
    bed.settle().await;

    let snapshot = bed.sync.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.unviewed_count(), 1);
}

#[tokio::test]
async fn test_hint_triggers_full_refresh() {
    let bed = TestBed::new(vec![hr_item("A", false, 10)]);
    bed.start(IDLE_POLL);
    bed.wait_for_fetches(1).await;

    // New server state arrives behind a hint-only push message.
    bed.transport
        .set_items(vec![hr_item("A", false, 10), hr_item("B", false, 11)]);
    assert!(bed.push.emit(PushEvent::Hint).await);
    bed.wait_for_fetches(2).await;
    bed.settle().await;

    assert_eq!(bed.sync.snapshot().len(), 2);
}

#[tokio::test]
async fn test_out_of_scope_push_never_enters_snapshot() {
    let bed = TestBed::new(vec![hr_item("A", false, 10)]);
    bed.start(IDLE_POLL);
    bed.wait_for_fetches(1).await;

    // An item for another company arrives on the shared channel.
    let mut foreign = hr_item("Z", false, 12);
    foreign.scope = ScopeTag {
        role: Some(Role::Hr),
        company: Some("SOC02".to_string()),
        ..ScopeTag::default()
    };
    assert!(bed.push.emit(PushEvent::Item(foreign)).await);
    // The engine falls back to a verifying refresh instead of merging.
    bed.wait_for_fetches(2).await;
    bed.settle().await;

    let snapshot = bed.sync.snapshot();
    assert!(snapshot.get(&ItemId::from("Z")).is_none());
    assert_eq!(snapshot.len(), 1);
}

#[tokio::test]
async fn test_push_subscribe_failure_leaves_polling_alive() {
    let bed = TestBed::new(vec![hr_item("A", false, 10)]);
    bed.push.fail_subscribe.store(true, Ordering::SeqCst);

    // Short interval: polling is the fallback source of truth.
    bed.start(Duration::from_millis(20));
    bed.wait_for_fetches(2).await;

    assert_eq!(bed.sync.snapshot().len(), 1);
    assert!(!bed.push.emit(PushEvent::Hint).await);
}

#[tokio::test]
async fn test_pushed_viewed_item_does_not_inflate_count() {
    let bed = TestBed::new(vec![hr_item("A", false, 10)]);
    bed.start(IDLE_POLL);
    bed.wait_for_fetches(1).await;

    assert!(bed.push.emit(PushEvent::Item(hr_item("B", true, 11))).await);
    bed.settle().await;

    let snapshot = bed.sync.snapshot();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.unviewed_count(), 1);
}
