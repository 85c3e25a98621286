use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use kbase_engine::{BatchReport, BatchRequest, ItemOutcome};

use crate::auth::MaybeRequester;
use crate::rest::engine_error_response;
use crate::AppState;

/// `POST /api/documents/batch`
///
/// Always 200 with a full report when the batch ran, including all-failure
/// outcomes. 400 for malformed bodies (unknown actions fail to parse),
/// 401/403 from the engine's authorization gate.
pub async fn run_batch(
    State(state): State<Arc<AppState>>,
    requester: MaybeRequester,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": rejection.body_text()})),
            )
                .into_response();
        }
    };

    match state
        .engine
        .run_batch(requester.0.as_ref(), request)
        .await
    {
        Ok(report) => (StatusCode::OK, Json(report_body(&report))).into_response(),
        Err(e) => engine_error_response(e),
    }
}

/// Wire shape: success/failed views plus derived counts, all computed from
/// the single outcome sequence.
fn report_body(report: &BatchReport) -> serde_json::Value {
    let success: Vec<serde_json::Value> = report.successes().map(outcome_json).collect();
    let failed: Vec<serde_json::Value> = report.failures().map(outcome_json).collect();

    serde_json::json!({
        "results": {
            "success": success,
            "failed": failed,
        },
        "total": report.total(),
        "successful": report.successful(),
        "failed": report.failed(),
    })
}

fn outcome_json(outcome: &ItemOutcome) -> serde_json::Value {
    let mut value = serde_json::to_value(outcome).unwrap_or_default();
    if let Some(map) = value.as_object_mut() {
        // The success/failed split already encodes the outcome tag.
        map.remove("outcome");
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbase_engine::ActionReceipt;
    use uuid::Uuid;

    #[test]
    fn report_body_shape() {
        let mut report = BatchReport::new();
        let archived = Uuid::new_v4();
        let missing = Uuid::new_v4();
        report.push(ItemOutcome::Success {
            document_id: archived,
            receipt: ActionReceipt::Archive,
        });
        report.push(ItemOutcome::Failure {
            document_id: missing,
            reason: "Document not found".to_string(),
        });

        let body = report_body(&report);
        assert_eq!(body["total"], 2);
        assert_eq!(body["successful"], 1);
        assert_eq!(body["failed"], 1);

        let success = body["results"]["success"].as_array().unwrap();
        assert_eq!(success.len(), 1);
        assert_eq!(success[0]["document_id"], archived.to_string());
        assert_eq!(success[0]["action"], "archive");
        assert!(success[0].get("outcome").is_none());

        let failed = body["results"]["failed"].as_array().unwrap();
        assert_eq!(failed[0]["document_id"], missing.to_string());
        assert_eq!(failed[0]["reason"], "Document not found");
    }

    #[test]
    fn draft_success_carries_draft_id() {
        let mut report = BatchReport::new();
        let draft_id = Uuid::new_v4();
        report.push(ItemOutcome::Success {
            document_id: Uuid::new_v4(),
            receipt: ActionReceipt::DraftUpdate {
                draft_id,
                changes_summary: "refreshed".to_string(),
            },
        });

        let body = report_body(&report);
        let entry = &body["results"]["success"][0];
        assert_eq!(entry["action"], "draft_update");
        assert_eq!(entry["draft_id"], draft_id.to_string());
        assert_eq!(entry["changes_summary"], "refreshed");
    }
}
