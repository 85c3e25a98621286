pub mod batch;
pub mod documents;
pub mod token;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::error;

use kbase_engine::EngineError;

/// Map request-level engine failures to HTTP statuses. Per-item failures
/// never reach here; they ride inside the 200 report.
pub(crate) fn engine_error_response(err: EngineError) -> Response {
    let status = match err {
        EngineError::Unauthorized => StatusCode::UNAUTHORIZED,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
    };
    (status, Json(serde_json::json!({"error": err.to_string()}))).into_response()
}

/// 500 for faults the handler did not anticipate. The detail goes to the
/// log, not the client.
pub(crate) fn internal_error(context: &str, err: anyhow::Error) -> Response {
    error!(error = %err, "{context}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "Internal server error"})),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbase_common::Role;

    #[test]
    fn engine_errors_map_to_statuses() {
        assert_eq!(
            engine_error_response(EngineError::Unauthorized).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            engine_error_response(EngineError::Forbidden(Role::Viewer)).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            engine_error_response(EngineError::InvalidRequest("empty".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
