//! The synchronizer's snapshot: its current belief about the server item
//! list, plus the derived unviewed count.
//!
//! Invariants, enforced by construction:
//! - `unviewed_count == items.filter(|i| !i.viewed).count()` — recomputed
//!   after every mutation, never drifted independently.
//! - items sorted newest-first by `created_at`, ties broken by `id`
//!   ascending.
//! - no two items share an id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::{Item, ItemId};

/// Version of the serialized snapshot shape. Bumping it invalidates every
/// persisted cache entry wholesale, so stale shapes are never deserialized.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 2;

/// Outcome of merging a pushed item into the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The item id was new and the item was inserted.
    Inserted,
    /// An item with the same id existed and was replaced in place.
    Replaced,
}

/// An ordered collection of items and the derived unviewed count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    items: Vec<Item>,
    unviewed_count: usize,
    fetched_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// An empty snapshot, the state before any cache load or fetch.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from a fetched item list.
    ///
    /// Sorts, drops duplicate ids (first occurrence after sorting wins),
    /// and recomputes the count.
    pub fn from_items(items: Vec<Item>, fetched_at: DateTime<Utc>) -> Self {
        let mut snapshot = Self {
            items,
            unviewed_count: 0,
            fetched_at: Some(fetched_at),
        };
        snapshot.normalize();
        snapshot
    }

    /// The ordered items.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The derived unviewed count.
    pub fn unviewed_count(&self) -> usize {
        self.unviewed_count
    }

    /// When the snapshot was last confirmed against the server, if ever.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Number of items held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the snapshot holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by id.
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Merge a single pushed item: insert if the id is new, replace in
    /// place if it already exists. Order and count are restored either
    /// way, so a genuinely new unviewed item raises the count by exactly
    /// one and a replacement only changes it if the viewed flag changed.
    pub fn merge(&mut self, item: Item) -> MergeOutcome {
        let outcome = match self.items.iter_mut().find(|held| held.id == item.id) {
            Some(held) => {
                *held = item;
                MergeOutcome::Replaced
            }
            None => {
                self.items.push(item);
                MergeOutcome::Inserted
            }
        };
        self.normalize();
        outcome
    }

    /// Set `viewed` on one item. Returns `false` if the id is absent.
    /// Marking an already-viewed item again is a no-op; the count never
    /// goes negative because it is recomputed, not decremented.
    pub fn mark_read(&mut self, id: &ItemId) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return false;
        };
        item.viewed = true;
        self.recount();
        true
    }

    /// Set `viewed` on every item. Returns how many items changed.
    /// Safe to call when nothing is unviewed.
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for item in &mut self.items {
            if !item.viewed {
                item.viewed = true;
                changed += 1;
            }
        }
        self.recount();
        changed
    }

    /// Ids of items currently viewed. Used to re-apply optimistic local
    /// read-state over a server list that has not caught up yet.
    pub fn viewed_ids(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|item| item.viewed)
            .map(|item| item.id.clone())
            .collect()
    }

    /// Re-apply local read-state: mark every listed id as viewed if the
    /// server still reports it unviewed. Keeps an optimistic `mark_read`
    /// from being silently reverted by an older concurrent fetch
    /// (last-writer-wins on `viewed`, documented tradeoff).
    pub fn preserve_viewed(&mut self, viewed: &[ItemId]) {
        for id in viewed {
            if let Some(item) = self.items.iter_mut().find(|item| &item.id == id) {
                item.viewed = true;
            }
        }
        self.recount();
    }

    fn normalize(&mut self) {
        self.items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        let mut seen = std::collections::HashSet::new();
        self.items.retain(|item| seen.insert(item.id.clone()));
        self.recount();
    }

    fn recount(&mut self) {
        self.unviewed_count = self.items.iter().filter(|item| !item.viewed).count();
    }
}

/// The serialized envelope written to the local snapshot store.
///
/// `version` and `scope_key` are checked on load: an envelope written by
/// an older schema, or for a different scope, is discarded rather than
/// deserialized into the wrong shape or shown to the wrong role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedSnapshot {
    /// Schema version at write time.
    pub version: u32,
    /// Cache key of the owning scope.
    pub scope_key: String,
    /// The items of the snapshot.
    pub items: Vec<Item>,
    /// Time of the last successful refresh.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl CachedSnapshot {
    /// Wrap a snapshot for persistence.
    pub fn new(snapshot: &Snapshot, scope_key: impl Into<String>) -> Self {
        Self {
            version: SNAPSHOT_SCHEMA_VERSION,
            scope_key: scope_key.into(),
            items: snapshot.items().to_vec(),
            fetched_at: snapshot.fetched_at(),
        }
    }

    /// Unwrap into a snapshot if the envelope is current and belongs to
    /// `scope_key`. Returns `None` otherwise.
    pub fn into_snapshot(self, scope_key: &str) -> Option<Snapshot> {
        if self.version != SNAPSHOT_SCHEMA_VERSION || self.scope_key != scope_key {
            return None;
        }
        let mut snapshot = Snapshot {
            items: self.items,
            unviewed_count: 0,
            fetched_at: self.fetched_at,
        };
        snapshot.normalize();
        Some(snapshot)
    }
}
