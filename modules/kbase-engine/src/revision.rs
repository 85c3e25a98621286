//! Draft construction: the revision prompt and the field set for the new
//! draft document.

use kbase_common::{Document, DocumentStatus, NewDocument, Requester};
use kbase_drafting::RevisionProposal;

pub const DRAFT_TITLE_PREFIX: &str = "[DRAFT] ";

/// Build the drafting prompt from the document's current title and content.
pub fn revision_prompt(doc: &Document) -> String {
    format!(
        "Review this knowledge-base document for outdated information.\n\
         \n\
         1. Identify statements that are likely outdated or no longer accurate.\n\
         2. Propose updated content, preserving the document's structure and headings.\n\
         3. List the sections that need manual review by a human editor.\n\
         \n\
         Title: {}\n\
         \n\
         {}",
        doc.title, doc.content
    )
}

/// Field set for the draft superseding `source`. The draft starts active at
/// `source.version + 1`, points back at the source, and is owned by the
/// requester who triggered the batch.
pub(crate) fn draft_from_proposal(
    source: &Document,
    proposal: &RevisionProposal,
    requester: &Requester,
) -> NewDocument {
    let base_title = proposal
        .suggested_title
        .as_deref()
        .unwrap_or(&source.title);

    NewDocument {
        title: format!("{DRAFT_TITLE_PREFIX}{base_title}"),
        content: proposal.suggested_content.clone(),
        doc_type: source.doc_type.clone(),
        tags: source.tags.clone(),
        status: DocumentStatus::Active,
        version: source.version + 1,
        previous_version_id: Some(source.id),
        owner_id: requester.id,
        owner_name: requester.name.clone(),
        ai_summary: Some(synthesize_summary(proposal)),
    }
}

/// Fold the service's change summary and review notes into the draft's
/// `ai_summary`.
fn synthesize_summary(proposal: &RevisionProposal) -> String {
    if proposal.requires_review.is_empty() {
        proposal.changes_summary.clone()
    } else {
        format!(
            "{} Needs review: {}",
            proposal.changes_summary,
            proposal.requires_review.join("; ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kbase_common::Role;
    use uuid::Uuid;

    fn source() -> Document {
        Document {
            id: Uuid::new_v4(),
            title: "VPN setup".to_string(),
            content: "Install the client.".to_string(),
            doc_type: "runbook".to_string(),
            tags: vec!["it".to_string()],
            status: DocumentStatus::Active,
            version: 3,
            previous_version_id: None,
            owner_id: Uuid::new_v4(),
            owner_name: "original author".to_string(),
            ai_summary: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn proposal(title: Option<&str>) -> RevisionProposal {
        RevisionProposal {
            suggested_title: title.map(String::from),
            suggested_content: "Install the v2 client.".to_string(),
            changes_summary: "Updated client version.".to_string(),
            requires_review: vec![],
        }
    }

    #[test]
    fn prompt_contains_title_and_content() {
        let doc = source();
        let prompt = revision_prompt(&doc);
        assert!(prompt.contains("VPN setup"));
        assert!(prompt.contains("Install the client."));
        assert!(prompt.contains("manual review"));
    }

    #[test]
    fn draft_links_back_and_bumps_version() {
        let doc = source();
        let requester = Requester::new("agent smith", Role::Agent);
        let draft = draft_from_proposal(&doc, &proposal(Some("VPN setup (2026)")), &requester);

        assert_eq!(draft.title, "[DRAFT] VPN setup (2026)");
        assert_eq!(draft.version, 4);
        assert_eq!(draft.previous_version_id, Some(doc.id));
        assert_eq!(draft.doc_type, "runbook");
        assert_eq!(draft.tags, vec!["it".to_string()]);
        assert_eq!(draft.status, DocumentStatus::Active);
        assert_eq!(draft.owner_id, requester.id);
        assert_eq!(draft.owner_name, "agent smith");
    }

    #[test]
    fn missing_title_falls_back_to_source() {
        let doc = source();
        let requester = Requester::new("agent smith", Role::Agent);
        let draft = draft_from_proposal(&doc, &proposal(None), &requester);
        assert_eq!(draft.title, "[DRAFT] VPN setup");
    }

    #[test]
    fn summary_includes_review_notes() {
        let mut p = proposal(None);
        p.requires_review = vec!["Pricing table".to_string(), "Login steps".to_string()];
        let requester = Requester::new("a", Role::Admin);
        let draft = draft_from_proposal(&source(), &p, &requester);
        let summary = draft.ai_summary.unwrap();
        assert!(summary.starts_with("Updated client version."));
        assert!(summary.contains("Pricing table; Login steps"));
    }
}
