//! Filter atoms used by the derived-view projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-status filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadFilter {
    /// Keep every item.
    #[default]
    All,
    /// Keep items not yet viewed.
    Unread,
    /// Keep items already viewed.
    Read,
}

impl ReadFilter {
    /// Whether an item with the given `viewed` flag passes the filter.
    pub fn accepts(&self, viewed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Unread => !viewed,
            Self::Read => viewed,
        }
    }
}

/// An inclusive date range. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Inclusive lower bound.
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound.
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Range covering everything at or after `from`.
    pub fn since(from: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    /// Range with both bounds.
    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Whether a single instant falls inside the range.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        if self.from.is_some_and(|from| instant < from) {
            return false;
        }
        if self.to.is_some_and(|to| instant > to) {
            return false;
        }
        true
    }

    /// Whether the interval `[start, end]` overlaps the range.
    ///
    /// Used for request-like items carrying a domain start/end pair: a
    /// record matches when its interval intersects the query interval.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        if self.to.is_some_and(|to| start > to) {
            return false;
        }
        if self.from.is_some_and(|from| end < from) {
            return false;
        }
        true
    }
}
