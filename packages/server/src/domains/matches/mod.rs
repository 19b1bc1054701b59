pub mod effects;
pub mod machine;
pub mod models;
pub mod roles;
pub mod service;
pub mod stage;
pub mod transcript;

pub use effects::{Effect, NotificationMessage};
pub use machine::{MatchError, MatchEvent, MatchPatch, Transition, TransitionContext};
pub use models::{Match, NewSubmission, StageSubmission};
pub use roles::Role;
pub use service::MatchService;
pub use stage::{ArgumentStage, MatchStatus, Side, Stage};

#[cfg(test)]
pub(crate) mod testing {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::common::{MatchId, PlayerId};

    use super::{Match, MatchStatus, Stage};

    /// A freshly created match in `pending_stake` with no stakes in.
    pub fn match_fixture() -> Match {
        Match {
            id: MatchId::new(),
            onchain_match_id: "0x0000000000000000000000000000000000000000000000000000000000000001"
                .to_string(),
            creator_id: PlayerId::new(),
            opponent_id: PlayerId::new(),
            case_id: None,
            stake_amount: Decimal::from(1_000_000u64),
            creator_staked: false,
            opponent_staked: false,
            side_picker_id: None,
            prosecution_player_id: None,
            defense_player_id: None,
            stage: Stage::PendingStake,
            winner_id: None,
            judgment_text: None,
            judgment_error: None,
            judgment_failed_at: None,
            status: MatchStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
