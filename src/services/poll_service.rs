//! Mutation orchestrator for the poll service.
//!
//! Every mutating operation runs its steps strictly in the order
//! validate -> sanitize -> authorize -> (vote: uniqueness guard) -> persist,
//! short-circuiting on the first failure. A failed step guarantees no later
//! step executed, so a returned error never coexists with a partial write.

use chrono::Utc;
use uuid::Uuid;

use crate::auth::Identity;
use crate::database::models::{Poll, PollResults, Vote};
use crate::database::store::{ListingCache, PollStore, StoreError};
use crate::error::CoreError;
use crate::policy::{self, Action};
use crate::sanitize::escape_html;
use crate::validate::{parse_poll_id, PollInput, PollPayload, VoteInput, VotePayload};

pub const POLL_NOT_FOUND: &str = "Poll not found.";
pub const INVALID_OPTION: &str = "Invalid option selected.";
pub const ALREADY_VOTED: &str = "You have already voted on this poll.";

const LISTING_PATH: &str = "/polls";

pub struct PollService<S, C> {
    store: S,
    cache: C,
    admin_emails: Vec<String>,
}

impl<S: PollStore, C: ListingCache> PollService<S, C> {
    pub fn new(store: S, cache: C, admin_emails: Vec<String>) -> Self {
        Self {
            store,
            cache,
            admin_emails,
        }
    }

    pub async fn create_poll(
        &self,
        identity: &Identity,
        payload: PollPayload,
    ) -> Result<Poll, CoreError> {
        let input = PollInput::parse(payload)?;

        let question = escape_html(&input.question);
        let options: Vec<String> = input.options.iter().map(|o| escape_html(o)).collect();

        policy::authorize(Action::Create, identity, &self.admin_emails)?;
        let owner_id = identity
            .user_id()
            .ok_or_else(|| CoreError::denied(policy::LOGIN_REQUIRED_CREATE))?;

        let now = Utc::now();
        let poll = Poll {
            id: Uuid::new_v4(),
            owner_id,
            question,
            options,
            created_at: now,
            updated_at: now,
        };
        self.store
            .insert_poll(&poll)
            .await
            .map_err(CoreError::storage)?;

        tracing::info!(poll_id = %poll.id, owner = %owner_id, "poll created");
        self.cache.invalidate(LISTING_PATH).await;
        Ok(poll)
    }

    pub async fn update_poll(
        &self,
        identity: &Identity,
        poll_id: &str,
        payload: PollPayload,
    ) -> Result<Poll, CoreError> {
        let poll_id = parse_poll_id(poll_id)?;
        let input = PollInput::parse(payload)?;

        let question = escape_html(&input.question);
        let options: Vec<String> = input.options.iter().map(|o| escape_html(o)).collect();

        let mut poll = self
            .store
            .get_poll(poll_id)
            .await
            .map_err(CoreError::storage)?
            .ok_or_else(|| CoreError::not_found(POLL_NOT_FOUND))?;

        policy::authorize(
            Action::Update {
                owner: poll.owner_id,
            },
            identity,
            &self.admin_emails,
        )?;

        let updated_at = Utc::now();
        let rows = self
            .store
            .update_poll(poll_id, poll.owner_id, &question, &options, updated_at)
            .await
            .map_err(CoreError::storage)?;
        if rows == 0 {
            // Deleted out from under us between the fetch and the update
            return Err(CoreError::not_found(POLL_NOT_FOUND));
        }

        poll.question = question;
        poll.options = options;
        poll.updated_at = updated_at;
        Ok(poll)
    }

    pub async fn delete_poll(&self, identity: &Identity, poll_id: &str) -> Result<(), CoreError> {
        let poll_id = parse_poll_id(poll_id)?;

        let poll = self
            .store
            .get_poll(poll_id)
            .await
            .map_err(CoreError::storage)?
            .ok_or_else(|| CoreError::not_found(POLL_NOT_FOUND))?;

        policy::authorize(
            Action::Delete {
                owner: poll.owner_id,
            },
            identity,
            &self.admin_emails,
        )?;

        self.store
            .delete_poll(poll_id)
            .await
            .map_err(CoreError::storage)?;

        tracing::info!(poll_id = %poll_id, "poll deleted");
        self.cache.invalidate(LISTING_PATH).await;
        Ok(())
    }

    /// Cast a vote, enforcing one vote per authenticated voter per poll.
    ///
    /// Two-phase uniqueness: an optimistic read gives fast feedback, and the
    /// store's unique constraint closes the window between that read and the
    /// insert. Both phases surface the same reason string. Anonymous voters
    /// have no stable id and are never uniqueness-checked; duplicate
    /// anonymous votes are a known, accepted limitation.
    pub async fn cast_vote(
        &self,
        identity: &Identity,
        poll_id: &str,
        payload: &VotePayload,
    ) -> Result<Vote, CoreError> {
        let input = VoteInput::parse(poll_id, payload)?;

        policy::authorize(Action::Vote, identity, &self.admin_emails)?;

        let poll = self
            .store
            .get_poll(input.poll_id)
            .await
            .map_err(CoreError::storage)?
            .ok_or_else(|| CoreError::not_found(POLL_NOT_FOUND))?;

        if input.option_index as usize >= poll.options.len() {
            return Err(CoreError::validation(INVALID_OPTION));
        }

        if let Some(voter_id) = identity.user_id() {
            let existing = self
                .store
                .find_vote(input.poll_id, voter_id)
                .await
                .map_err(CoreError::storage)?;
            if existing.is_some() {
                return Err(CoreError::conflict(ALREADY_VOTED));
            }
        }

        let vote = Vote {
            id: Uuid::new_v4(),
            poll_id: input.poll_id,
            voter_id: identity.user_id(),
            option_index: input.option_index,
            created_at: Utc::now(),
        };
        match self.store.insert_vote(&vote).await {
            Ok(()) => {
                tracing::info!(poll_id = %vote.poll_id, option = vote.option_index, "vote recorded");
                Ok(vote)
            }
            // Lost the race against a concurrent vote by the same voter
            Err(StoreError::UniqueViolation) => Err(CoreError::conflict(ALREADY_VOTED)),
            Err(e) => Err(CoreError::storage(e)),
        }
    }

    pub async fn get_poll(&self, poll_id: &str) -> Result<PollResults, CoreError> {
        let poll_id = parse_poll_id(poll_id)?;
        let poll = self
            .store
            .get_poll(poll_id)
            .await
            .map_err(CoreError::storage)?
            .ok_or_else(|| CoreError::not_found(POLL_NOT_FOUND))?;

        let tallies = self
            .store
            .count_votes(poll_id)
            .await
            .map_err(CoreError::storage)?;

        let mut counts = vec![0i64; poll.options.len()];
        for (index, count) in tallies {
            if let Some(slot) = counts.get_mut(index as usize) {
                *slot = count;
            }
        }

        Ok(PollResults { poll, counts })
    }

    pub async fn list_polls(&self) -> Result<Vec<Poll>, CoreError> {
        self.store.list_polls().await.map_err(CoreError::storage)
    }
}
