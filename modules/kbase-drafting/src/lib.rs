//! Generative drafting service.
//!
//! The batch engine talks to `DraftingService`: submit a free-text prompt,
//! get back JSON conforming to a fixed response schema. The production
//! implementation (`DraftAssistant`) drives the Anthropic Messages API with
//! a tool-forced schema derived from the Rust response type, so a malformed
//! model response surfaces as a parse error rather than junk fields.

pub mod assistant;
pub mod claude;
pub mod error;
pub mod schema;
pub mod traits;

pub use assistant::DraftAssistant;
pub use claude::Claude;
pub use error::DraftingError;
pub use schema::StructuredOutput;
pub use traits::{DraftingService, RevisionProposal};
