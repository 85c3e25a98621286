use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use kbase_common::{Document, DocumentFilter, DocumentPatch, NewDocument};

/// Persistence boundary for documents.
///
/// Implemented by PgDocumentStore (production) and MemoryDocumentStore
/// (tests). Also implemented for `Arc<S>` so a store can be shared between
/// the engine and test assertions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lookup one document by id. `None` if absent.
    async fn get(&self, id: Uuid) -> Result<Option<Document>>;

    /// All documents matching a field-equality filter, newest first.
    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<Document>>;

    /// Create a document from a field set. The store generates the id and
    /// timestamps and echoes the stored row.
    async fn create(&self, new_doc: NewDocument) -> Result<Document>;

    /// Update named fields of a document by id. Errors if the document
    /// does not exist.
    async fn update(&self, id: Uuid, patch: DocumentPatch) -> Result<Document>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    async fn get(&self, id: Uuid) -> Result<Option<Document>> {
        (**self).get(id).await
    }

    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<Document>> {
        (**self).find(filter).await
    }

    async fn create(&self, new_doc: NewDocument) -> Result<Document> {
        (**self).create(new_doc).await
    }

    async fn update(&self, id: Uuid, patch: DocumentPatch) -> Result<Document> {
        (**self).update(id, patch).await
    }
}
