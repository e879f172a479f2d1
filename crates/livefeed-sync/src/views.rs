//! Derived views: pure, side-effect-free projections over a snapshot.
//!
//! Safe to call on every render or poll tick; nothing here touches the
//! network, the store, or the synchronizer's state.

use livefeed_core::types::filter::{DateRange, ReadFilter};
use livefeed_entity::{Category, Item, Snapshot};

/// Conjunctive filter parameters over a snapshot.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    /// Read-status filter.
    pub read: ReadFilter,
    /// Case-insensitive needle matched against title and message.
    pub query: Option<String>,
    /// Category filter.
    pub category: Option<Category>,
    /// Date filter: request-like items match when their domain interval
    /// overlaps the range, other items when `created_at` falls inside.
    pub range: Option<DateRange>,
}

impl ItemFilter {
    /// Keep only unread items.
    pub fn unread() -> Self {
        Self {
            read: ReadFilter::Unread,
            ..Self::default()
        }
    }

    /// Whether one item passes every set filter.
    pub fn accepts(&self, item: &Item) -> bool {
        if !self.read.accepts(item.viewed) {
            return false;
        }
        if let Some(query) = &self.query {
            let needle = query.to_lowercase();
            let haystack_hit = item.title.to_lowercase().contains(&needle)
                || item.message.to_lowercase().contains(&needle);
            if !haystack_hit {
                return false;
            }
        }
        if self.category.is_some_and(|category| category != item.category) {
            return false;
        }
        if let Some(range) = &self.range {
            let hit = match item.interval() {
                Some((start, end)) => range.overlaps(start, end),
                None => range.contains(item.created_at),
            };
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Apply a filter, preserving snapshot order.
pub fn filtered<'a>(snapshot: &'a Snapshot, filter: &ItemFilter) -> Vec<&'a Item> {
    snapshot
        .items()
        .iter()
        .filter(|item| filter.accepts(item))
        .collect()
}

/// The unread items, newest first.
pub fn unread(snapshot: &Snapshot) -> Vec<&Item> {
    filtered(snapshot, &ItemFilter::unread())
}
