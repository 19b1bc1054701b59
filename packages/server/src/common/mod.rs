//! Shared building blocks: typed IDs and the error taxonomy.

pub mod entity_ids;
pub mod errors;
pub mod id;

pub use entity_ids::{CaseId, MatchId, NotificationId, PlayerId, SubmissionId};
pub use errors::ApiError;
pub use id::Id;
