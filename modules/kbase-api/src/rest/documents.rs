use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use kbase_common::{DocumentFilter, DocumentPatch, DocumentStatus, NewDocument};
use kbase_drafting::DraftingService;
use kbase_store::DocumentStore;

use crate::auth::AuthedRequester;
use crate::rest::internal_error;
use crate::AppState;

#[derive(Deserialize)]
pub struct ListParams {
    status: Option<String>,
    #[serde(rename = "type")]
    doc_type: Option<String>,
    tag: Option<String>,
}

/// `GET /api/documents` — optional equality filters via query params.
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    _requester: AuthedRequester,
    Query(params): Query<ListParams>,
) -> Response {
    let status = match params.status.as_deref() {
        None => None,
        Some(s) => match DocumentStatus::parse(s) {
            Some(status) => Some(status),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({"error": format!("Unknown status '{s}'")})),
                )
                    .into_response();
            }
        },
    };

    let filter = DocumentFilter {
        status,
        doc_type: params.doc_type,
        tag: params.tag,
        owner_id: None,
    };

    match state.store.find(&filter).await {
        Ok(documents) => Json(documents).into_response(),
        Err(e) => internal_error("Failed to list documents", e),
    }
}

/// `GET /api/documents/{id}`
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    _requester: AuthedRequester,
    Path(id): Path<Uuid>,
) -> Response {
    match state.store.get(id).await {
        Ok(Some(document)) => Json(document).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Document not found"})),
        )
            .into_response(),
        Err(e) => internal_error("Failed to fetch document", e),
    }
}

#[derive(Deserialize)]
pub struct CreateDocumentBody {
    title: String,
    content: String,
    #[serde(rename = "type")]
    doc_type: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// `POST /api/documents` — privileged. New documents start active at
/// version 1.
pub async fn create_document(
    State(state): State<Arc<AppState>>,
    AuthedRequester(requester): AuthedRequester,
    Json(body): Json<CreateDocumentBody>,
) -> Response {
    if !requester.role.is_privileged() {
        return forbidden(&requester.role.to_string());
    }
    if body.title.trim().is_empty() || body.content.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "title and content must not be empty"})),
        )
            .into_response();
    }

    let new_doc = NewDocument::authored(
        body.title,
        body.content,
        body.doc_type,
        body.tags,
        &requester,
    );

    match state.store.create(new_doc).await {
        Ok(document) => {
            info!(document_id = %document.id, owner = %requester.name, "Document created");
            (StatusCode::CREATED, Json(document)).into_response()
        }
        Err(e) => internal_error("Failed to create document", e),
    }
}

/// `POST /api/documents/{id}/summary` — privileged. Generates and persists
/// `ai_summary` via the drafting service.
pub async fn generate_summary(
    State(state): State<Arc<AppState>>,
    AuthedRequester(requester): AuthedRequester,
    Path(id): Path<Uuid>,
) -> Response {
    if !requester.role.is_privileged() {
        return forbidden(&requester.role.to_string());
    }

    let document = match state.store.get(id).await {
        Ok(Some(document)) => document,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "Document not found"})),
            )
                .into_response();
        }
        Err(e) => return internal_error("Failed to fetch document", e),
    };

    let summary = match state
        .drafting
        .summarize(&document.title, &document.content)
        .await
    {
        Ok(summary) => summary,
        Err(e) => return internal_error("Summary generation failed", e),
    };

    match state.store.update(id, DocumentPatch::summary(summary)).await {
        Ok(updated) => {
            info!(document_id = %id, "Summary generated");
            Json(updated).into_response()
        }
        Err(e) => internal_error("Failed to store summary", e),
    }
}

fn forbidden(role: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(serde_json::json!({"error": format!("Role '{role}' may not modify documents")})),
    )
        .into_response()
}
