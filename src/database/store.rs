//! Persistence and presentation collaborator contracts.
//!
//! The store is the single source of truth and the only point of
//! cross-request coordination. It must report a uniqueness violation on vote
//! insert as a distinguishable error; that constraint is the authoritative
//! backstop for the vote guard's optimistic pre-check.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::models::{Poll, Vote};

#[derive(Debug, Error)]
pub enum StoreError {
    /// An insert collided with a uniqueness constraint.
    #[error("uniqueness constraint violated")]
    UniqueViolation,

    #[error("{0}")]
    Backend(String),
}

#[async_trait]
pub trait PollStore: Send + Sync {
    async fn insert_poll(&self, poll: &Poll) -> Result<(), StoreError>;

    async fn get_poll(&self, id: Uuid) -> Result<Option<Poll>, StoreError>;

    /// All polls, newest first.
    async fn list_polls(&self) -> Result<Vec<Poll>, StoreError>;

    /// Update scoped by id AND owner; returns rows affected. The owner filter
    /// is a second line of defense under the policy check. `updated_at` is
    /// supplied by the caller so the persisted row and the returned value
    /// carry the same timestamp.
    async fn update_poll(
        &self,
        id: Uuid,
        owner_id: Uuid,
        question: &str,
        options: &[String],
        updated_at: DateTime<Utc>,
    ) -> Result<u64, StoreError>;

    /// Delete by id; returns rows affected. Votes for the poll go with it.
    async fn delete_poll(&self, id: Uuid) -> Result<u64, StoreError>;

    async fn find_vote(&self, poll_id: Uuid, voter_id: Uuid) -> Result<Option<Vote>, StoreError>;

    /// Insert a vote row. Must fail with `StoreError::UniqueViolation` when a
    /// vote by the same authenticated voter already exists for the poll.
    async fn insert_vote(&self, vote: &Vote) -> Result<(), StoreError>;

    /// Vote tally per option index for a poll.
    async fn count_votes(&self, poll_id: Uuid) -> Result<Vec<(i32, i64)>, StoreError>;
}

/// Invalidation signal to the presentation/caching collaborator. Fired only
/// after a successful write that changes poll listings.
#[async_trait]
pub trait ListingCache: Send + Sync {
    async fn invalidate(&self, path: &str);
}

/// Production cache signal: the view layer subscribes to these events
/// out-of-process, so emitting the trace record is the whole job here.
#[derive(Debug, Clone, Default)]
pub struct LoggingCache;

#[async_trait]
impl ListingCache for LoggingCache {
    async fn invalidate(&self, path: &str) {
        tracing::debug!(path, "listing cache invalidated");
    }
}
