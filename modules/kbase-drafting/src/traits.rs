use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The fixed response shape for a draft revision.
///
/// `suggested_title` is optional on purpose: the engine falls back to the
/// source title when the service omits one.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RevisionProposal {
    /// Updated title, or null to keep the original
    pub suggested_title: Option<String>,
    /// Full revised content, preserving the document's structure
    pub suggested_content: String,
    /// Short summary of what changed and why
    pub changes_summary: String,
    /// Sections a human should review before publishing
    pub requires_review: Vec<String>,
}

/// External drafting collaborator: prompt in, schema-shaped JSON out.
///
/// Model choice, latency, and cost live behind this boundary. Implemented
/// by `DraftAssistant` (Anthropic) and by mocks in engine tests. Also
/// implemented for `Arc<D>` so one service can be shared across engines.
#[async_trait]
pub trait DraftingService: Send + Sync {
    /// Propose a revision of a document. The prompt carries the source
    /// title and content plus the revision instructions.
    async fn propose_revision(&self, prompt: &str) -> Result<RevisionProposal>;

    /// One-paragraph summary of a document.
    async fn summarize(&self, title: &str, content: &str) -> Result<String>;
}

#[async_trait]
impl<D: DraftingService + ?Sized> DraftingService for Arc<D> {
    async fn propose_revision(&self, prompt: &str) -> Result<RevisionProposal> {
        (**self).propose_revision(prompt).await
    }

    async fn summarize(&self, title: &str, content: &str) -> Result<String> {
        (**self).summarize(title, content).await
    }
}
