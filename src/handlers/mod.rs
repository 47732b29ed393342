pub mod health;
pub mod polls;
pub mod votes;

use std::sync::Arc;

use crate::database::postgres::PgPollStore;
use crate::database::store::LoggingCache;
use crate::services::PollService;

/// Concrete service type behind the HTTP surface.
pub type AppService = PollService<PgPollStore, LoggingCache>;

pub type AppState = Arc<AppService>;
