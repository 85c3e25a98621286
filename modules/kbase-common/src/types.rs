use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Documents
// =============================================================================

/// Lifecycle status of a document. Archiving is the only in-place status
/// transition; drafts always start out `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Active,
    Archived,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Active => "active",
            DocumentStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(DocumentStatus::Active),
            "archived" => Some(DocumentStatus::Archived),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A knowledge-base document. The unit of work for the batch engine.
///
/// `previous_version_id` is a relation, not ownership: a draft points back at
/// the document it supersedes, and its `version` is strictly greater than the
/// referenced document's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Category label ("faq", "runbook", "policy", ...). Free-form.
    pub doc_type: String,
    pub tags: Vec<String>,
    pub status: DocumentStatus,
    pub version: i32,
    pub previous_version_id: Option<Uuid>,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub ai_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field set for creating a document. The store generates the id and
/// timestamps and echoes the stored row back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
    pub doc_type: String,
    pub tags: Vec<String>,
    pub status: DocumentStatus,
    pub version: i32,
    pub previous_version_id: Option<Uuid>,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub ai_summary: Option<String>,
}

impl NewDocument {
    /// A fresh user-authored document: active, version 1, no back-reference.
    pub fn authored(
        title: impl Into<String>,
        content: impl Into<String>,
        doc_type: impl Into<String>,
        tags: Vec<String>,
        owner: &Requester,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            doc_type: doc_type.into(),
            tags,
            status: DocumentStatus::Active,
            version: 1,
            previous_version_id: None,
            owner_id: owner.id,
            owner_name: owner.name.clone(),
            ai_summary: None,
        }
    }
}

/// Named-field update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<DocumentStatus>,
    pub ai_summary: Option<String>,
}

impl DocumentPatch {
    pub fn archive() -> Self {
        Self {
            status: Some(DocumentStatus::Archived),
            ..Default::default()
        }
    }

    pub fn summary(text: impl Into<String>) -> Self {
        Self {
            ai_summary: Some(text.into()),
            ..Default::default()
        }
    }
}

/// Field-equality filter for listing documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentFilter {
    pub status: Option<DocumentStatus>,
    pub doc_type: Option<String>,
    pub tag: Option<String>,
    pub owner_id: Option<Uuid>,
}

// =============================================================================
// Requesters
// =============================================================================

/// Caller role. Admins and agents may run batch actions and mutate
/// documents; viewers are read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Agent,
    Viewer,
}

impl Role {
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin | Role::Agent)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Agent => "agent",
            Role::Viewer => "viewer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "agent" => Some(Role::Agent),
            "viewer" => Some(Role::Viewer),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The authenticated caller, passed into the engine as an explicit
/// capability rather than read from ambient session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requester {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
}

impl Requester {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip() {
        assert_eq!(DocumentStatus::parse("active"), Some(DocumentStatus::Active));
        assert_eq!(DocumentStatus::parse("archived"), Some(DocumentStatus::Archived));
        assert_eq!(DocumentStatus::parse("deleted"), None);
        assert_eq!(DocumentStatus::Archived.as_str(), "archived");
    }

    #[test]
    fn role_privilege() {
        assert!(Role::Admin.is_privileged());
        assert!(Role::Agent.is_privileged());
        assert!(!Role::Viewer.is_privileged());
    }

    #[test]
    fn role_parse_is_strict() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("Admin"), None);
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn patch_archive_touches_only_status() {
        let patch = DocumentPatch::archive();
        assert_eq!(patch.status, Some(DocumentStatus::Archived));
        assert!(patch.title.is_none());
        assert!(patch.content.is_none());
        assert!(patch.ai_summary.is_none());
    }
}
