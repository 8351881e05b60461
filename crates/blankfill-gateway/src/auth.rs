// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer token authentication middleware for the gateway.
//!
//! Every `/request` route requires `Authorization: Bearer <jwt>`. A missing
//! header, a scheme other than `Bearer`, a bad signature or an expired token
//! all get `403`. When no secret is configured all requests are rejected
//! (fail-closed).

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::jwt::JwtVerifier;

/// Authentication state shared with the middleware.
#[derive(Clone, Debug)]
pub struct AuthState {
    /// Token verifier. `None` rejects every request.
    pub verifier: Option<Arc<JwtVerifier>>,
}

impl AuthState {
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            verifier: secret.map(|s| Arc::new(JwtVerifier::new(s))),
        }
    }
}

/// Extract the credentials of a `Bearer` authorization header value.
fn bearer_token(value: &str) -> Result<&str, ApiError> {
    let (scheme, credentials) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| ApiError::Forbidden("Not authenticated".into()))?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(ApiError::Forbidden("Invalid authentication scheme.".into()));
    }
    let credentials = credentials.trim();
    if credentials.is_empty() {
        return Err(ApiError::Forbidden("Not authenticated".into()));
    }
    Ok(credentials)
}

/// Middleware that validates the bearer JWT of each request.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(verifier) = auth.verifier.as_ref() else {
        tracing::error!("gateway has no jwt secret configured -- rejecting request");
        return Err(ApiError::Forbidden("Authentication is not configured".into()));
    };

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Forbidden("Not authenticated".into()))?;
    let token = bearer_token(header)?;

    if let Err(e) = verifier.verify(token) {
        tracing::debug!(error = %e, "bearer token rejected");
        return Err(ApiError::Forbidden(format!("Invalid authorization parameters: {e}")));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer_token("Bearer abc").unwrap(), "abc");
        assert_eq!(bearer_token("bearer abc").unwrap(), "abc");
    }

    #[test]
    fn other_schemes_and_bare_tokens_are_rejected() {
        assert!(bearer_token("token").is_err());
        assert!(bearer_token("Basic dXNlcjpwYXNz").is_err());
        assert!(bearer_token("Bearer ").is_err());
    }

    #[test]
    fn missing_secret_disables_verifier() {
        assert!(AuthState::new(None).verifier.is_none());
        assert!(AuthState::new(Some("s")).verifier.is_some());
    }
}
