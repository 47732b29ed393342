// Shared test doubles and fixtures for the service-level tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use quickpoll_api::auth::Identity;
use quickpoll_api::database::models::{Poll, Vote};
use quickpoll_api::database::store::{ListingCache, PollStore, StoreError};
use quickpoll_api::services::PollService;
use quickpoll_api::validate::{PollPayload, VotePayload};

/// In-memory `PollStore` honoring the same contract as the Postgres
/// implementation, including the unique-violation report on duplicate
/// authenticated votes.
#[derive(Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    polls: HashMap<Uuid, Poll>,
    votes: Vec<Vote>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll_count(&self) -> usize {
        self.inner.lock().unwrap().polls.len()
    }

    pub fn vote_count(&self) -> usize {
        self.inner.lock().unwrap().votes.len()
    }

    pub fn votes_for(&self, poll_id: Uuid, voter_id: Uuid) -> usize {
        self.inner
            .lock()
            .unwrap()
            .votes
            .iter()
            .filter(|v| v.poll_id == poll_id && v.voter_id == Some(voter_id))
            .count()
    }

    pub fn stored_poll(&self, poll_id: Uuid) -> Option<Poll> {
        self.inner.lock().unwrap().polls.get(&poll_id).cloned()
    }
}

#[async_trait]
impl PollStore for MemoryStore {
    async fn insert_poll(&self, poll: &Poll) -> Result<(), StoreError> {
        self.inner
            .lock()
            .unwrap()
            .polls
            .insert(poll.id, poll.clone());
        Ok(())
    }

    async fn get_poll(&self, id: Uuid) -> Result<Option<Poll>, StoreError> {
        Ok(self.inner.lock().unwrap().polls.get(&id).cloned())
    }

    async fn list_polls(&self) -> Result<Vec<Poll>, StoreError> {
        let mut polls: Vec<Poll> = self.inner.lock().unwrap().polls.values().cloned().collect();
        polls.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(polls)
    }

    async fn update_poll(
        &self,
        id: Uuid,
        owner_id: Uuid,
        question: &str,
        options: &[String],
        updated_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.polls.get_mut(&id) {
            Some(poll) if poll.owner_id == owner_id => {
                poll.question = question.to_string();
                poll.options = options.to_vec();
                poll.updated_at = updated_at;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete_poll(&self, id: Uuid) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.polls.remove(&id).is_some() {
            inner.votes.retain(|v| v.poll_id != id);
            Ok(1)
        } else {
            Ok(0)
        }
    }

    async fn find_vote(&self, poll_id: Uuid, voter_id: Uuid) -> Result<Option<Vote>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .votes
            .iter()
            .find(|v| v.poll_id == poll_id && v.voter_id == Some(voter_id))
            .cloned())
    }

    async fn insert_vote(&self, vote: &Vote) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(voter_id) = vote.voter_id {
            let duplicate = inner
                .votes
                .iter()
                .any(|v| v.poll_id == vote.poll_id && v.voter_id == Some(voter_id));
            if duplicate {
                return Err(StoreError::UniqueViolation);
            }
        }
        inner.votes.push(vote.clone());
        Ok(())
    }

    async fn count_votes(&self, poll_id: Uuid) -> Result<Vec<(i32, i64)>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut counts: HashMap<i32, i64> = HashMap::new();
        for vote in inner.votes.iter().filter(|v| v.poll_id == poll_id) {
            *counts.entry(vote.option_index).or_insert(0) += 1;
        }
        let mut counts: Vec<(i32, i64)> = counts.into_iter().collect();
        counts.sort();
        Ok(counts)
    }
}

/// Records invalidation signals so tests can assert when (and only when) they
/// fire.
#[derive(Default, Clone)]
pub struct RecordingCache {
    invalidated: Arc<Mutex<Vec<String>>>,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidations(&self) -> Vec<String> {
        self.invalidated.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListingCache for RecordingCache {
    async fn invalidate(&self, path: &str) {
        self.invalidated.lock().unwrap().push(path.to_string());
    }
}

pub const ADMIN_EMAIL: &str = "root@example.com";

pub fn admin_list() -> Vec<String> {
    vec![ADMIN_EMAIL.to_string()]
}

pub fn service() -> (
    PollService<MemoryStore, RecordingCache>,
    MemoryStore,
    RecordingCache,
) {
    let store = MemoryStore::new();
    let cache = RecordingCache::new();
    let service = PollService::new(store.clone(), cache.clone(), admin_list());
    (service, store, cache)
}

pub fn alice() -> Identity {
    Identity::authenticated(
        Uuid::parse_str("11111111-1111-4111-8111-111111111111").unwrap(),
        "alice@example.com",
    )
}

pub fn bob() -> Identity {
    Identity::authenticated(
        Uuid::parse_str("22222222-2222-4222-8222-222222222222").unwrap(),
        "bob@example.com",
    )
}

pub fn admin() -> Identity {
    Identity::authenticated(
        Uuid::parse_str("33333333-3333-4333-8333-333333333333").unwrap(),
        ADMIN_EMAIL,
    )
}

pub fn poll_payload(question: &str, options: &[&str]) -> PollPayload {
    serde_json::from_value(serde_json::json!({
        "question": question,
        "options": options,
    }))
    .expect("payload deserializes")
}

pub fn vote_payload(option: &str) -> VotePayload {
    serde_json::from_value(serde_json::json!({ "option": option })).expect("payload deserializes")
}
