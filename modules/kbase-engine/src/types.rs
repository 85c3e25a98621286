use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Requests
// =============================================================================

/// The action applied uniformly to every id in a batch.
///
/// Closed set, matched exhaustively: adding an action is a compile-time
/// decision. Unknown action strings fail deserialization at the wire
/// boundary and never reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchAction {
    Archive,
    DraftUpdate,
}

impl BatchAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchAction::Archive => "archive",
            BatchAction::DraftUpdate => "draft_update",
        }
    }
}

impl std::fmt::Display for BatchAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Batch input: a non-empty ordered id list (duplicates allowed, each
/// processed independently) and the action selector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    #[serde(alias = "documentIds")]
    pub document_ids: Vec<Uuid>,
    pub action: BatchAction,
}

// =============================================================================
// Outcomes
// =============================================================================

/// Action-specific payload of a successful item.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionReceipt {
    Archive,
    DraftUpdate { draft_id: Uuid, changes_summary: String },
}

/// One outcome per input id. A single tagged sequence instead of two
/// parallel lists, so success/failure counts cannot drift apart.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ItemOutcome {
    Success {
        document_id: Uuid,
        #[serde(flatten)]
        receipt: ActionReceipt,
    },
    Failure {
        document_id: Uuid,
        reason: String,
    },
}

impl ItemOutcome {
    pub fn document_id(&self) -> Uuid {
        match self {
            ItemOutcome::Success { document_id, .. } => *document_id,
            ItemOutcome::Failure { document_id, .. } => *document_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Success { .. })
    }
}

/// Ordered outcomes for a batch, one entry per input id. Counts are
/// derived views, not stored fields.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: ItemOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.outcomes
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.successful()
    }

    pub fn successes(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_wire_names() {
        assert_eq!(
            serde_json::to_value(BatchAction::Archive).unwrap(),
            serde_json::json!("archive")
        );
        assert_eq!(
            serde_json::to_value(BatchAction::DraftUpdate).unwrap(),
            serde_json::json!("draft_update")
        );
    }

    #[test]
    fn unknown_action_fails_deserialization() {
        let body = r#"{"document_ids": [], "action": "delete_forever"}"#;
        assert!(serde_json::from_str::<BatchRequest>(body).is_err());
    }

    #[test]
    fn camel_case_id_list_is_accepted() {
        let body = format!(
            r#"{{"documentIds": ["{}"], "action": "archive"}}"#,
            Uuid::new_v4()
        );
        let request: BatchRequest = serde_json::from_str(&body).unwrap();
        assert_eq!(request.document_ids.len(), 1);
        assert_eq!(request.action, BatchAction::Archive);
    }

    #[test]
    fn counts_are_derived_from_outcomes() {
        let mut report = BatchReport::new();
        report.push(ItemOutcome::Success {
            document_id: Uuid::new_v4(),
            receipt: ActionReceipt::Archive,
        });
        report.push(ItemOutcome::Failure {
            document_id: Uuid::new_v4(),
            reason: "Document not found".to_string(),
        });
        report.push(ItemOutcome::Failure {
            document_id: Uuid::new_v4(),
            reason: "drafting service unavailable".to_string(),
        });

        assert_eq!(report.total(), 3);
        assert_eq!(report.successful(), 1);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.successes().count(), 1);
        assert_eq!(report.failures().count(), 2);
    }

    #[test]
    fn outcome_json_carries_action_tag() {
        let outcome = ItemOutcome::Success {
            document_id: Uuid::new_v4(),
            receipt: ActionReceipt::DraftUpdate {
                draft_id: Uuid::new_v4(),
                changes_summary: "refreshed pricing".to_string(),
            },
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["outcome"], "success");
        assert_eq!(value["action"], "draft_update");
        assert!(value["draft_id"].is_string());
    }
}
