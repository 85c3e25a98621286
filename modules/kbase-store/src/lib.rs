//! Document persistence.
//!
//! `DocumentStore` is the collaborator boundary the batch engine works
//! against: lookup by id, lookup by field-equality filter, create, and
//! named-field update. Each call is independent — no transactions or batch
//! writes are required of an implementation.
//!
//! Two implementations: `PgDocumentStore` (postgres) and
//! `MemoryDocumentStore` (tests — records writes for assertions).

pub mod memory;
pub mod pg;
pub mod traits;

pub use memory::MemoryDocumentStore;
pub use pg::PgDocumentStore;
pub use traits::DocumentStore;
