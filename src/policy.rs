//! Authorization rules for the five mutating operations.
//!
//! The administrator allow-list is passed in explicitly so the policy can be
//! exercised with arbitrary lists; it is never read from global state here.

use uuid::Uuid;

use crate::auth::Identity;
use crate::error::CoreError;

pub const LOGIN_REQUIRED_CREATE: &str = "You must be logged in to create a poll.";
pub const LOGIN_REQUIRED_UPDATE: &str = "You must be logged in to update a poll.";
pub const LOGIN_REQUIRED_DELETE: &str = "You must be logged in to delete a poll.";
pub const NOT_YOUR_POLL_UPDATE: &str = "You can only update your own polls.";
pub const NOT_YOUR_POLL_DELETE: &str = "You can only delete your own polls.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update { owner: Uuid },
    Delete { owner: Uuid },
    Vote,
}

/// Decide whether `identity` may perform `action`.
///
/// Administrator status is derived, never stored: an authenticated identity
/// is an administrator iff its email is an exact, case-sensitive member of
/// `admin_emails`. The override applies to delete only.
pub fn authorize(
    action: Action,
    identity: &Identity,
    admin_emails: &[String],
) -> Result<(), CoreError> {
    match action {
        Action::Create => match identity {
            Identity::Authenticated { .. } => Ok(()),
            Identity::Anonymous => Err(CoreError::denied(LOGIN_REQUIRED_CREATE)),
        },
        Action::Update { owner } => match identity {
            Identity::Authenticated { id, .. } if *id == owner => Ok(()),
            Identity::Authenticated { .. } => Err(CoreError::denied(NOT_YOUR_POLL_UPDATE)),
            Identity::Anonymous => Err(CoreError::denied(LOGIN_REQUIRED_UPDATE)),
        },
        Action::Delete { owner } => match identity {
            Identity::Authenticated { id, .. } if *id == owner => Ok(()),
            Identity::Authenticated { email, .. } if is_admin(email, admin_emails) => Ok(()),
            Identity::Authenticated { .. } => Err(CoreError::denied(NOT_YOUR_POLL_DELETE)),
            Identity::Anonymous => Err(CoreError::denied(LOGIN_REQUIRED_DELETE)),
        },
        // Anonymous voting is permitted; uniqueness is the guard's concern
        Action::Vote => Ok(()),
    }
}

fn is_admin(email: &str, admin_emails: &[String]) -> bool {
    admin_emails.iter().any(|e| e == email)
}
