use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The resolved caller of a request.
///
/// "No session" is a valid outcome (anonymous), not an error; only a failing
/// lookup of an existing session surfaces as `CoreError::AuthResolution`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Authenticated { id: Uuid, email: String },
    Anonymous,
}

impl Identity {
    pub fn authenticated(id: Uuid, email: impl Into<String>) -> Self {
        Identity::Authenticated {
            id,
            email: email.into(),
        }
    }

    /// Stable id of the caller, if any.
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Identity::Authenticated { id, .. } => Some(*id),
            Identity::Anonymous => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, expiry_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email,
            exp: (now + Duration::hours(expiry_hours)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("JWT secret not configured")]
    MissingSecret,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("token generation failed: {0}")]
    Generation(String),
}

/// Mint a session token. Used by the operator tooling that provisions
/// accounts; this service itself only verifies.
pub fn generate_token(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Generation(e.to_string()))
}

/// Verify a bearer token and extract its claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| TokenError::Invalid(e.to_string()))?;
    Ok(data.claims)
}
