// In-memory store for tests. No database required.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use kbase_common::{Document, DocumentFilter, DocumentPatch, KbaseError, NewDocument};

use crate::traits::DocumentStore;

/// In-memory document store. Thread-safe. Counts write calls (create +
/// update) so tests can assert "zero store writes" for rejected batches.
pub struct MemoryDocumentStore {
    docs: Mutex<HashMap<Uuid, Document>>,
    writes: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            docs: Mutex::new(HashMap::new()),
            writes: AtomicUsize::new(0),
        }
    }

    /// Insert a fixture document directly, bypassing the write counter.
    pub fn seed(&self, doc: Document) {
        self.docs.lock().unwrap().insert(doc.id, doc);
    }

    /// Read a document without going through the trait (for assertions).
    pub fn document(&self, id: Uuid) -> Option<Document> {
        self.docs.lock().unwrap().get(&id).cloned()
    }

    /// All stored documents (for assertions).
    pub fn all(&self) -> Vec<Document> {
        self.docs.lock().unwrap().values().cloned().collect()
    }

    /// Number of write calls (create + update) made through the trait.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.docs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(doc: &Document, filter: &DocumentFilter) -> bool {
    if let Some(status) = filter.status {
        if doc.status != status {
            return false;
        }
    }
    if let Some(ref doc_type) = filter.doc_type {
        if &doc.doc_type != doc_type {
            return false;
        }
    }
    if let Some(ref tag) = filter.tag {
        if !doc.tags.contains(tag) {
            return false;
        }
    }
    if let Some(owner_id) = filter.owner_id {
        if doc.owner_id != owner_id {
            return false;
        }
    }
    true
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, id: Uuid) -> Result<Option<Document>> {
        Ok(self.docs.lock().unwrap().get(&id).cloned())
    }

    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<Document>> {
        let mut found: Vec<Document> = self
            .docs
            .lock()
            .unwrap()
            .values()
            .filter(|d| matches(d, filter))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(found)
    }

    async fn create(&self, new_doc: NewDocument) -> Result<Document> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let doc = Document {
            id: Uuid::new_v4(),
            title: new_doc.title,
            content: new_doc.content,
            doc_type: new_doc.doc_type,
            tags: new_doc.tags,
            status: new_doc.status,
            version: new_doc.version,
            previous_version_id: new_doc.previous_version_id,
            owner_id: new_doc.owner_id,
            owner_name: new_doc.owner_name,
            ai_summary: new_doc.ai_summary,
            created_at: now,
            updated_at: now,
        };
        self.docs.lock().unwrap().insert(doc.id, doc.clone());
        Ok(doc)
    }

    async fn update(&self, id: Uuid, patch: DocumentPatch) -> Result<Document> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut docs = self.docs.lock().unwrap();
        let Some(doc) = docs.get_mut(&id) else {
            return Err(KbaseError::NotFound(id).into());
        };
        if let Some(title) = patch.title {
            doc.title = title;
        }
        if let Some(content) = patch.content {
            doc.content = content;
        }
        if let Some(status) = patch.status {
            doc.status = status;
        }
        if let Some(summary) = patch.ai_summary {
            doc.ai_summary = Some(summary);
        }
        doc.updated_at = Utc::now();
        Ok(doc.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbase_common::{DocumentStatus, Requester, Role};

    fn new_doc(title: &str) -> NewDocument {
        let owner = Requester::new("tester", Role::Agent);
        NewDocument::authored(title, "body", "faq", vec!["billing".to_string()], &owner)
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = MemoryDocumentStore::new();
        let created = store.create(new_doc("How to reset a password")).await.unwrap();
        let fetched = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "How to reset a password");
        assert_eq!(fetched.version, 1);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = MemoryDocumentStore::new();
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_missing_errors() {
        let store = MemoryDocumentStore::new();
        let err = store
            .update(Uuid::new_v4(), DocumentPatch::archive())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Document not found"));
    }

    #[tokio::test]
    async fn find_filters_by_status_and_tag() {
        let store = MemoryDocumentStore::new();
        let a = store.create(new_doc("a")).await.unwrap();
        let b = store.create(new_doc("b")).await.unwrap();
        store.update(b.id, DocumentPatch::archive()).await.unwrap();

        let active = store
            .find(&DocumentFilter {
                status: Some(DocumentStatus::Active),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, a.id);

        let tagged = store
            .find(&DocumentFilter {
                tag: Some("billing".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(tagged.len(), 2);

        let none = store
            .find(&DocumentFilter {
                tag: Some("unused".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn seed_bypasses_write_counter() {
        let store = MemoryDocumentStore::new();
        let doc = store.create(new_doc("counted")).await.unwrap();
        store.seed(Document {
            id: Uuid::new_v4(),
            ..doc
        });
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.len(), 2);
    }
}
