use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Poll {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub question: String,
    pub options: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cast vote. Immutable once inserted; never updated.
/// `voter_id` is None for anonymous voters, who carry no stable identity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vote {
    pub id: Uuid,
    pub poll_id: Uuid,
    pub voter_id: Option<Uuid>,
    pub option_index: i32,
    pub created_at: DateTime<Utc>,
}

/// Poll with per-option tallies, for the read endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct PollResults {
    pub poll: Poll,
    pub counts: Vec<i64>,
}
