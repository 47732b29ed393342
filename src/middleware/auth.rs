use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{verify_token, Identity};
use crate::config;
use crate::error::CoreError;

/// Resolves the calling identity for every request and injects it as an
/// extension.
///
/// No Authorization header means the caller is anonymous; that is a normal
/// outcome, not a failure. A header that is present but malformed, or a token
/// that does not verify, is a resolution failure and ends the request with
/// 401 before any handler runs.
pub async fn identity_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, CoreError> {
    let secret = &config::config().security.jwt_secret;
    let identity = resolve_identity(&headers, secret)?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn resolve_identity(headers: &HeaderMap, secret: &str) -> Result<Identity, CoreError> {
    let auth_header = match headers.get("authorization") {
        Some(value) => value,
        None => return Ok(Identity::Anonymous),
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| CoreError::AuthResolution("Invalid Authorization header format".to_string()))?;

    let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        CoreError::AuthResolution("Authorization header must use Bearer token format".to_string())
    })?;

    let claims = verify_token(token.trim(), secret)
        .map_err(|e| CoreError::AuthResolution(e.to_string()))?;

    Ok(Identity::authenticated(claims.sub, claims.email))
}
