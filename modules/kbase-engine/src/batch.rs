//! The batch loop.

use anyhow::Result;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use kbase_common::{Document, DocumentPatch, Requester, Role};
use kbase_drafting::DraftingService;
use kbase_store::DocumentStore;

use crate::revision::{draft_from_proposal, revision_prompt};
use crate::types::{ActionReceipt, BatchAction, BatchRequest, BatchReport, ItemOutcome};

/// Request-level failures. These abort before any document is touched;
/// per-item failures are folded into the report instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unauthorized: no authenticated requester")]
    Unauthorized,

    #[error("Forbidden: role '{0}' may not run batch actions")]
    Forbidden(Role),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Applies one action to each id in a batch, best-effort per item.
///
/// Sequential: each item fully completes (including any drafting round
/// trip) before the next begins. No retries, no global rollback — no
/// multi-document invariant spans the batch.
pub struct BatchEngine<S, D> {
    store: S,
    drafting: D,
}

impl<S: DocumentStore, D: DraftingService> BatchEngine<S, D> {
    pub fn new(store: S, drafting: D) -> Self {
        Self { store, drafting }
    }

    /// Run a batch on behalf of `requester`. The authorization check runs
    /// once, before any store call.
    pub async fn run_batch(
        &self,
        requester: Option<&Requester>,
        request: BatchRequest,
    ) -> Result<BatchReport, EngineError> {
        let requester = requester.ok_or(EngineError::Unauthorized)?;
        if !requester.role.is_privileged() {
            return Err(EngineError::Forbidden(requester.role));
        }
        if request.document_ids.is_empty() {
            return Err(EngineError::InvalidRequest(
                "document_ids must not be empty".to_string(),
            ));
        }

        let mut report = BatchReport::new();
        for &id in &request.document_ids {
            report.push(self.process_item(id, request.action, requester).await);
        }

        info!(
            action = %request.action,
            total = report.total(),
            successful = report.successful(),
            failed = report.failed(),
            "Batch complete"
        );

        Ok(report)
    }

    /// One item, one outcome. Every failure path lands here as a recorded
    /// `Failure` so siblings keep processing.
    async fn process_item(&self, id: Uuid, action: BatchAction, requester: &Requester) -> ItemOutcome {
        let doc = match self.store.get(id).await {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                return ItemOutcome::Failure {
                    document_id: id,
                    reason: "Document not found".to_string(),
                }
            }
            Err(e) => {
                warn!(document_id = %id, error = %e, "Document lookup failed");
                return ItemOutcome::Failure {
                    document_id: id,
                    reason: e.to_string(),
                };
            }
        };

        let result = match action {
            BatchAction::Archive => self.archive(&doc).await,
            BatchAction::DraftUpdate => self.draft_update(&doc, requester).await,
        };

        match result {
            Ok(receipt) => ItemOutcome::Success {
                document_id: id,
                receipt,
            },
            Err(e) => {
                warn!(document_id = %id, action = %action, error = %e, "Batch item failed");
                ItemOutcome::Failure {
                    document_id: id,
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn archive(&self, doc: &Document) -> Result<ActionReceipt> {
        self.store.update(doc.id, DocumentPatch::archive()).await?;
        Ok(ActionReceipt::Archive)
    }

    /// Propose a revision and create the draft. The draft either fully
    /// exists afterwards or nothing was written; the source is never
    /// mutated.
    async fn draft_update(&self, source: &Document, requester: &Requester) -> Result<ActionReceipt> {
        let prompt = revision_prompt(source);
        let proposal = self.drafting.propose_revision(&prompt).await?;
        let draft = self
            .store
            .create(draft_from_proposal(source, &proposal, requester))
            .await?;

        info!(
            source_id = %source.id,
            draft_id = %draft.id,
            version = draft.version,
            "Draft created"
        );

        Ok(ActionReceipt::DraftUpdate {
            draft_id: draft.id,
            changes_summary: proposal.changes_summary,
        })
    }
}
