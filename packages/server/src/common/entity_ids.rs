//! Typed ID definitions for all domain entities.
//!
//! Type aliases over [`Id`] give compile-time safety when passing IDs around:
//! a `PlayerId` can never be handed to a query expecting a `MatchId`.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Player entities.
pub struct Player;

/// Marker type for Match entities (one instance of the adjudication game).
pub struct Match;

/// Marker type for StageSubmission entities.
pub struct StageSubmission;

/// Marker type for Notification entities.
pub struct Notification;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Player entities.
pub type PlayerId = Id<Player>;

/// Typed ID for Match entities.
pub type MatchId = Id<Match>;

/// Typed ID for StageSubmission entities.
pub type SubmissionId = Id<StageSubmission>;

/// Typed ID for Notification entities.
pub type NotificationId = Id<Notification>;

/// Case ids are small and sequential (the catalog is seeded once), so they
/// stay plain integers rather than UUID wrappers.
pub type CaseId = i32;
