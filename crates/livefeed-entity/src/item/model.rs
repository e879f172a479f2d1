//! Item entity model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use livefeed_core::types::scope::ScopeTag;

use super::category::Category;
use super::status::RequestStatus;

/// Opaque item identifier, stable across fetches.
///
/// The backend uses document-store string ids; the newtype keeps them
/// from being confused with other strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    /// View the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A server-owned record held in the synchronizer's snapshot: a
/// notification or a workflow request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier; primary key for merge and dedup.
    pub id: ItemId,
    /// Short display title.
    #[serde(default)]
    pub title: String,
    /// Body text.
    pub message: String,
    /// Item category.
    pub category: Category,
    /// Workflow status, present on request-like items.
    #[serde(default)]
    pub status: Option<RequestStatus>,
    /// Whether the user has viewed this item.
    #[serde(default)]
    pub viewed: bool,
    /// Creation timestamp; sort key, newest first.
    pub created_at: DateTime<Utc>,
    /// Domain interval start (e.g. first day of a leave request).
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    /// Domain interval end.
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    /// Partition fields the item arrived tagged with.
    #[serde(flatten)]
    pub scope: ScopeTag,
}

impl Item {
    /// The domain interval of a request-like item, when both bounds are
    /// present.
    pub fn interval(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.starts_at, self.ends_at) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Whether the item has not been viewed yet.
    pub fn is_unviewed(&self) -> bool {
        !self.viewed
    }
}
