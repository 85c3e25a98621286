use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::info;
use uuid::Uuid;

use kbase_common::{Requester, Role};

use crate::auth::constant_time_eq;
use crate::AppState;

#[derive(Deserialize)]
pub struct TokenRequest {
    username: String,
    password: String,
}

/// `POST /api/auth/token` — exchange the configured admin credentials for
/// a bearer token. Just enough auth plumbing to exercise the role gate.
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TokenRequest>,
) -> Response {
    let user_ok = constant_time_eq(
        body.username.as_bytes(),
        state.config.admin_username.as_bytes(),
    );
    let pass_ok = constant_time_eq(
        body.password.as_bytes(),
        state.config.admin_password.as_bytes(),
    );
    if !(user_ok && pass_ok) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "Invalid credentials"})),
        )
            .into_response();
    }

    let requester = Requester {
        id: username_to_uuid(&body.username),
        name: body.username,
        role: Role::Admin,
    };

    match state.jwt.create_token(&requester) {
        Ok(token) => {
            info!(user = %requester.name, "Token issued");
            Json(serde_json::json!({"token": token})).into_response()
        }
        Err(e) => crate::rest::internal_error("Failed to issue token", e),
    }
}

/// Derive a deterministic UUID from a username, so repeated logins map to
/// the same requester id without a user table.
fn username_to_uuid(username: &str) -> Uuid {
    let mut hasher = Sha256::new();
    hasher.update(b"kbase-user:");
    hasher.update(username.as_bytes());
    let hash = hasher.finalize();
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash[..16]);
    // Stamp version/variant bits so the result is a well-formed UUID.
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    Uuid::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_requester_id() {
        assert_eq!(username_to_uuid("admin"), username_to_uuid("admin"));
        assert_ne!(username_to_uuid("admin"), username_to_uuid("other"));
    }

    #[test]
    fn derived_id_is_valid_uuid() {
        let id = username_to_uuid("admin");
        assert_eq!(id.get_version_num(), 4);
    }
}
