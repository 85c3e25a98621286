use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};

use kbase_common::Requester;

use crate::AppState;

/// Authenticated requester. Extract this in handlers that require a valid
/// bearer token; rejects with 401 otherwise. Privilege checks stay with
/// the handler (or the engine), which returns 403.
pub struct AuthedRequester(pub Requester);

impl FromRequestParts<Arc<AppState>> for AuthedRequester {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match requester_from_parts(parts, state) {
            Some(requester) => Ok(AuthedRequester(requester)),
            None => Err((
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"error": "Missing or invalid bearer token"})),
            )
                .into_response()),
        }
    }
}

/// Like `AuthedRequester` but never rejects: `None` when the token is
/// missing or invalid. The batch endpoint uses this so the engine's own
/// authorization gate decides the outcome.
pub struct MaybeRequester(pub Option<Requester>);

impl FromRequestParts<Arc<AppState>> for MaybeRequester {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeRequester(requester_from_parts(parts, state)))
    }
}

fn requester_from_parts(parts: &Parts, state: &Arc<AppState>) -> Option<Requester> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?;
    let token = header.strip_prefix("Bearer ")?;
    state.jwt.verify_token(token).ok()
}

/// Constant-time comparison to prevent timing attacks on credentials.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_time_eq_matches() {
        assert!(constant_time_eq(b"secret", b"secret"));
        assert!(!constant_time_eq(b"secret", b"secreT"));
        assert!(!constant_time_eq(b"secret", b"secret2"));
        assert!(!constant_time_eq(b"", b"x"));
        assert!(constant_time_eq(b"", b""));
    }
}
