//! Pending side effects emitted by state transitions.
//!
//! Transitions stay pure: they return the effects to run, and the service
//! executes them only after the state write commits. This keeps notification
//! fan-out, the adjudication trigger, and the fund release out of the
//! transition function itself.

use crate::common::PlayerId;
use crate::domains::notifications::NotificationKind;

use super::stage::{ArgumentStage, Side};

/// A side effect to execute after a transition commits.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Record a notification for a player.
    Notify {
        player_id: PlayerId,
        message: NotificationMessage,
    },
    /// Spawn the detached adjudication task (entering `judgment`).
    BeginAdjudication,
    /// Instruct the escrow to pay out. Best-effort: failure never reverts
    /// the completed state. The executor resolves the winner's wallet.
    ReleaseFunds { winner: PlayerId },
}

/// Typed notification content. Rendering lives here so every transition
/// produces consistent copy.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationMessage {
    /// Sent to the opponent when a match is created.
    ChallengeReceived {
        creator_wallet: String,
        stake_amount: String,
    },
    /// Sent to the other side when one side's stake confirms.
    OpponentStaked { staker_wallet: String },
    /// Both stakes confirmed, case drawn. Differentiated for the picker.
    CaseAssigned { is_side_picker: bool },
    /// Sides bound after the picker chose.
    SideAssigned { side: Side },
    /// A new argument stage awaits this player's submission.
    YourTurn { stage: ArgumentStage },
    /// The opponent submitted first for the current stage.
    OpponentSubmitted { stage: ArgumentStage },
    /// Verdict delivered. Differentiated for winner and loser.
    VerdictDelivered { won: bool },
}

impl NotificationMessage {
    pub fn kind(&self) -> NotificationKind {
        match self {
            NotificationMessage::ChallengeReceived { .. } => NotificationKind::MatchInvitation,
            NotificationMessage::OpponentStaked { .. } => NotificationKind::OpponentStaked,
            NotificationMessage::CaseAssigned { .. } => NotificationKind::CaseAssigned,
            NotificationMessage::SideAssigned { .. } => NotificationKind::SideAssigned,
            NotificationMessage::YourTurn { .. } => NotificationKind::YourTurn,
            NotificationMessage::OpponentSubmitted { .. } => NotificationKind::OpponentSubmitted,
            NotificationMessage::VerdictDelivered { .. } => NotificationKind::VerdictDelivered,
        }
    }

    pub fn title(&self) -> String {
        match self {
            NotificationMessage::ChallengeReceived { .. } => "New Match Challenge".to_string(),
            NotificationMessage::OpponentStaked { .. } => "Opponent Staked".to_string(),
            NotificationMessage::CaseAssigned { .. } => "Case Assigned".to_string(),
            NotificationMessage::SideAssigned { .. } => "Sides Chosen".to_string(),
            NotificationMessage::YourTurn { .. } => "Your Turn".to_string(),
            NotificationMessage::OpponentSubmitted { .. } => "Opponent Submitted".to_string(),
            NotificationMessage::VerdictDelivered { won: true } => "Victory".to_string(),
            NotificationMessage::VerdictDelivered { won: false } => "Verdict Delivered".to_string(),
        }
    }

    pub fn body(&self) -> String {
        match self {
            NotificationMessage::ChallengeReceived {
                creator_wallet,
                stake_amount,
            } => format!(
                "You have been challenged by {} to a trial. Stake: {}. Accept by staking on-chain.",
                creator_wallet, stake_amount
            ),
            NotificationMessage::OpponentStaked { staker_wallet } => format!(
                "{} has staked. Waiting for your stake to begin the trial.",
                staker_wallet
            ),
            NotificationMessage::CaseAssigned {
                is_side_picker: true,
            } => "Both players have staked. You have been chosen to pick your side: prosecution or defense.".to_string(),
            NotificationMessage::CaseAssigned {
                is_side_picker: false,
            } => "Both players have staked. Waiting for your opponent to choose sides.".to_string(),
            NotificationMessage::SideAssigned { side } => format!(
                "You are playing as the {}. The trial begins with initial arguments.",
                side
            ),
            NotificationMessage::YourTurn { stage } => format!(
                "It's time for {}. Submit your arguments now.",
                stage.display_name()
            ),
            NotificationMessage::OpponentSubmitted { stage } => format!(
                "Your opponent has submitted their {}. Your turn if you haven't already.",
                stage.display_name()
            ),
            NotificationMessage::VerdictDelivered { won: true } => {
                "The judge ruled in your favor. Your winnings have been sent to your wallet."
                    .to_string()
            }
            NotificationMessage::VerdictDelivered { won: false } => {
                "The judge has delivered the verdict. The ruling was not in your favor this time."
                    .to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picker_and_non_picker_copy_differ() {
        let picker = NotificationMessage::CaseAssigned {
            is_side_picker: true,
        };
        let other = NotificationMessage::CaseAssigned {
            is_side_picker: false,
        };
        assert_eq!(picker.kind(), other.kind());
        assert_ne!(picker.body(), other.body());
    }

    #[test]
    fn winner_and_loser_copy_differ() {
        let won = NotificationMessage::VerdictDelivered { won: true };
        let lost = NotificationMessage::VerdictDelivered { won: false };
        assert_ne!(won.title(), lost.title());
        assert_ne!(won.body(), lost.body());
    }

    #[test]
    fn stage_names_appear_in_turn_notifications() {
        let msg = NotificationMessage::YourTurn {
            stage: ArgumentStage::EvidencesWitnesses,
        };
        assert!(msg.body().contains("Evidence & Witnesses"));
    }
}
