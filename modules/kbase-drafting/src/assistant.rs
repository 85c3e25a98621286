use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

use crate::claude::Claude;
use crate::traits::{DraftingService, RevisionProposal};

const REVISION_SYSTEM: &str = "You are a technical writer maintaining a knowledge base. \
    Given a document, identify potentially outdated information, propose updated content \
    that preserves the document's structure and headings, and list any sections that need \
    manual review by a human editor. Do not invent facts; when unsure, flag the section \
    for review instead.";

const SUMMARY_SYSTEM: &str = "You summarize knowledge-base documents. Produce one short \
    paragraph a support agent can scan to decide whether the document answers a question.";

#[derive(Debug, Deserialize, JsonSchema)]
struct SummaryResult {
    /// One-paragraph summary of the document
    summary: String,
}

/// Production drafting service backed by the Anthropic API.
#[derive(Clone)]
pub struct DraftAssistant {
    claude: Claude,
}

impl DraftAssistant {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            claude: Claude::new(api_key, model),
        }
    }

    pub fn model(&self) -> &str {
        self.claude.model()
    }
}

#[async_trait]
impl DraftingService for DraftAssistant {
    async fn propose_revision(&self, prompt: &str) -> Result<RevisionProposal> {
        debug!(model = self.model(), "proposing revision");
        let proposal = self.claude.extract::<RevisionProposal>(REVISION_SYSTEM, prompt).await?;
        Ok(proposal)
    }

    async fn summarize(&self, title: &str, content: &str) -> Result<String> {
        let user = format!("Title: {title}\n\n{content}");
        let result = self.claude.extract::<SummaryResult>(SUMMARY_SYSTEM, &user).await?;
        Ok(result.summary)
    }
}
