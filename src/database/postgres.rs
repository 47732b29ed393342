use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Poll, Vote};
use super::store::{PollStore, StoreError};

/// Postgres-backed store. Schema in `schema.sql`; the partial unique index on
/// `votes (poll_id, voter_id)` is what makes `insert_vote` report duplicates.
pub struct PgPollStore {
    pool: PgPool,
}

impl PgPollStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::UniqueViolation,
        _ => StoreError::Backend(err.to_string()),
    }
}

#[async_trait]
impl PollStore for PgPollStore {
    async fn insert_poll(&self, poll: &Poll) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO polls (id, owner_id, question, options, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(poll.id)
        .bind(poll.owner_id)
        .bind(&poll.question)
        .bind(&poll.options)
        .bind(poll.created_at)
        .bind(poll.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn get_poll(&self, id: Uuid) -> Result<Option<Poll>, StoreError> {
        sqlx::query_as::<_, Poll>("SELECT * FROM polls WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn list_polls(&self) -> Result<Vec<Poll>, StoreError> {
        sqlx::query_as::<_, Poll>("SELECT * FROM polls ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn update_poll(
        &self,
        id: Uuid,
        owner_id: Uuid,
        question: &str,
        options: &[String],
        updated_at: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE polls SET question = $3, options = $4, updated_at = $5 \
             WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .bind(question)
        .bind(options)
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(result.rows_affected())
    }

    async fn delete_poll(&self, id: Uuid) -> Result<u64, StoreError> {
        // votes.poll_id carries ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM polls WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(result.rows_affected())
    }

    async fn find_vote(&self, poll_id: Uuid, voter_id: Uuid) -> Result<Option<Vote>, StoreError> {
        sqlx::query_as::<_, Vote>("SELECT * FROM votes WHERE poll_id = $1 AND voter_id = $2")
            .bind(poll_id)
            .bind(voter_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn insert_vote(&self, vote: &Vote) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO votes (id, poll_id, voter_id, option_index, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(vote.id)
        .bind(vote.poll_id)
        .bind(vote.voter_id)
        .bind(vote.option_index)
        .bind(vote.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn count_votes(&self, poll_id: Uuid) -> Result<Vec<(i32, i64)>, StoreError> {
        sqlx::query_as::<_, (i32, i64)>(
            "SELECT option_index, COUNT(*) FROM votes WHERE poll_id = $1 \
             GROUP BY option_index ORDER BY option_index",
        )
        .bind(poll_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }
}
