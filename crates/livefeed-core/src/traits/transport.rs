//! Transport trait for the item REST surface.

use async_trait::async_trait;

use crate::result::SyncResult;
use crate::types::scope::Scope;

/// Trait for the REST surface serving a live list.
///
/// Defined with a generic item parameter so the engine can be exercised
/// with scripted fakes; the production implementation decodes the wire
/// item shape over HTTP.
#[async_trait]
pub trait ListTransport<I>: Send + Sync + std::fmt::Debug + 'static
where
    I: Send + 'static,
{
    /// Fetch the authoritative item list for a scope.
    async fn fetch_items(&self, scope: &Scope) -> SyncResult<Vec<I>>;

    /// Fetch the authoritative unviewed count for a scope.
    ///
    /// Callers treat a failure here as soft: the count is then derived
    /// from the item list instead.
    async fn fetch_unread_count(&self, scope: &Scope) -> SyncResult<u64>;

    /// Mark a single item as read on the server.
    async fn mark_read(&self, scope: &Scope, item_id: &str) -> SyncResult<()>;

    /// Mark every in-scope item as read on the server.
    /// Returns the number of items the server reports as updated.
    async fn mark_all_read(&self, scope: &Scope) -> SyncResult<u64>;
}
