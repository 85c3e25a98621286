// Postgres persistence for documents.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use kbase_common::{
    Document, DocumentFilter, DocumentPatch, DocumentStatus, KbaseError, NewDocument,
};

use crate::traits::DocumentStore;

pub struct PgDocumentStore {
    pool: PgPool,
}

/// A row from the documents table. Status is stored as text and parsed on
/// the way out so a bad row surfaces as an error instead of a panic.
#[derive(Debug, Clone, sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    title: String,
    content: String,
    doc_type: String,
    tags: Vec<String>,
    status: String,
    version: i32,
    previous_version_id: Option<Uuid>,
    owner_id: Uuid,
    owner_name: String,
    ai_summary: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DocumentRow {
    fn into_document(self) -> Result<Document> {
        let Some(status) = DocumentStatus::parse(&self.status) else {
            return Err(KbaseError::Database(format!(
                "document {} has unknown status '{}'",
                self.id, self.status
            ))
            .into());
        };
        Ok(Document {
            id: self.id,
            title: self.title,
            content: self.content,
            doc_type: self.doc_type,
            tags: self.tags,
            status,
            version: self.version,
            previous_version_id: self.previous_version_id,
            owner_id: self.owner_id,
            owner_name: self.owner_name,
            ai_summary: self.ai_summary,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const COLUMNS: &str = "id, title, content, doc_type, tags, status, version, \
     previous_version_id, owner_id, owner_name, ai_summary, created_at, updated_at";

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded SQL migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, id: Uuid) -> Result<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {COLUMNS} FROM documents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(DocumentRow::into_document).transpose()
    }

    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            SELECT {COLUMNS} FROM documents
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR doc_type = $2)
              AND ($3::text IS NULL OR $3 = ANY(tags))
              AND ($4::uuid IS NULL OR owner_id = $4)
            ORDER BY updated_at DESC
            "#
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(&filter.doc_type)
        .bind(&filter.tag)
        .bind(filter.owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(DocumentRow::into_document).collect()
    }

    async fn create(&self, new_doc: NewDocument) -> Result<Document> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            INSERT INTO documents
                (title, content, doc_type, tags, status, version,
                 previous_version_id, owner_id, owner_name, ai_summary)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&new_doc.title)
        .bind(&new_doc.content)
        .bind(&new_doc.doc_type)
        .bind(&new_doc.tags)
        .bind(new_doc.status.as_str())
        .bind(new_doc.version)
        .bind(new_doc.previous_version_id)
        .bind(new_doc.owner_id)
        .bind(&new_doc.owner_name)
        .bind(&new_doc.ai_summary)
        .fetch_one(&self.pool)
        .await?;

        row.into_document()
    }

    async fn update(&self, id: Uuid, patch: DocumentPatch) -> Result<Document> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            UPDATE documents SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                status = COALESCE($4, status),
                ai_summary = COALESCE($5, ai_summary),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.content)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(&patch.ai_summary)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.into_document(),
            None => Err(KbaseError::NotFound(id).into()),
        }
    }
}
