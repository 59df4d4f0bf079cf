//! Port for the unread-count badge cache.
//!
//! Unread counts are read-mostly, so they may be served from a cache, but
//! the cache must be invalidated synchronously with any write that changes a
//! recipient's unread set. Cache failures are soft: the feed falls back to
//! the repository and a polling client tolerates staleness bounded by its
//! poll interval.

use async_trait::async_trait;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by unread badge cache adapters.
    pub enum UnreadBadgeCacheError {
        /// The cache backend failed.
        Backend { message: String } =>
            "unread badge cache failed: {message}",
    }
}

/// Port for caching per-recipient unread counts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnreadBadgeCache: Send + Sync {
    /// Fetch the cached count, if present.
    async fn get(&self, recipient_id: UserId) -> Result<Option<u64>, UnreadBadgeCacheError>;

    /// Store a freshly computed count.
    async fn put(&self, recipient_id: UserId, count: u64) -> Result<(), UnreadBadgeCacheError>;

    /// Drop the cached count after a write changed the unread set.
    async fn invalidate(&self, recipient_id: UserId) -> Result<(), UnreadBadgeCacheError>;
}

/// Cache that stores nothing. Every read misses; every write succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpUnreadBadgeCache;

#[async_trait]
impl UnreadBadgeCache for NoOpUnreadBadgeCache {
    async fn get(&self, _recipient_id: UserId) -> Result<Option<u64>, UnreadBadgeCacheError> {
        Ok(None)
    }

    async fn put(&self, _recipient_id: UserId, _count: u64) -> Result<(), UnreadBadgeCacheError> {
        Ok(())
    }

    async fn invalidate(&self, _recipient_id: UserId) -> Result<(), UnreadBadgeCacheError> {
        Ok(())
    }
}
