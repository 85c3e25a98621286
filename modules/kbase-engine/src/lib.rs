//! Batch workflow engine.
//!
//! Applies one action (archive, or AI-assisted draft revision) to a list of
//! document ids: a single authorization check gates the batch, then items
//! are processed independently — a failing item records a failure outcome
//! and never aborts its siblings. The engine always returns exactly one
//! outcome per input id.
//!
//! Collaborators are traits: `DocumentStore` (persistence) and
//! `DraftingService` (generative revision), so the engine runs against
//! in-memory doubles in tests.

pub mod batch;
pub mod revision;
pub mod types;

pub use batch::{BatchEngine, EngineError};
pub use revision::revision_prompt;
pub use types::{ActionReceipt, BatchAction, BatchReport, BatchRequest, ItemOutcome};
