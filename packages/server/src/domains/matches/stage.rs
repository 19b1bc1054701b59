//! Stage, side, and status enums for the match workflow.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// The match workflow stage. Strictly linear: no skipping, no regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_stage", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    PendingStake,
    SideSelection,
    InitialArguments,
    EvidencesWitnesses,
    FinalArguments,
    Judgment,
    Completed,
}

impl Stage {
    /// All stages in workflow order.
    pub const ORDER: [Stage; 7] = [
        Stage::PendingStake,
        Stage::SideSelection,
        Stage::InitialArguments,
        Stage::EvidencesWitnesses,
        Stage::FinalArguments,
        Stage::Judgment,
        Stage::Completed,
    ];

    /// Position in the fixed workflow order.
    pub fn index(self) -> usize {
        Self::ORDER.iter().position(|s| *s == self).unwrap_or(0)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::PendingStake => "pending_stake",
            Stage::SideSelection => "side_selection",
            Stage::InitialArguments => "initial_arguments",
            Stage::EvidencesWitnesses => "evidences_witnesses",
            Stage::FinalArguments => "final_arguments",
            Stage::Judgment => "judgment",
            Stage::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

/// The three stages that accept player submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "argument_stage", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ArgumentStage {
    InitialArguments,
    EvidencesWitnesses,
    FinalArguments,
}

impl ArgumentStage {
    /// The submission stage corresponding to a match stage, if any.
    pub fn from_stage(stage: Stage) -> Option<Self> {
        match stage {
            Stage::InitialArguments => Some(ArgumentStage::InitialArguments),
            Stage::EvidencesWitnesses => Some(ArgumentStage::EvidencesWitnesses),
            Stage::FinalArguments => Some(ArgumentStage::FinalArguments),
            _ => None,
        }
    }

    /// The match stage entered once both sides have submitted here.
    pub fn next_stage(self) -> Stage {
        match self {
            ArgumentStage::InitialArguments => Stage::EvidencesWitnesses,
            ArgumentStage::EvidencesWitnesses => Stage::FinalArguments,
            ArgumentStage::FinalArguments => Stage::Judgment,
        }
    }

    /// Human-readable name used in notifications.
    pub fn display_name(self) -> &'static str {
        match self {
            ArgumentStage::InitialArguments => "Initial Arguments",
            ArgumentStage::EvidencesWitnesses => "Evidence & Witnesses",
            ArgumentStage::FinalArguments => "Final Arguments",
        }
    }
}

impl std::fmt::Display for ArgumentStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ArgumentStage::InitialArguments => "initial_arguments",
            ArgumentStage::EvidencesWitnesses => "evidences_witnesses",
            ArgumentStage::FinalArguments => "final_arguments",
        };
        write!(f, "{}", s)
    }
}

/// A trial side. Exactly two; every match binds one player to each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "trial_side", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Prosecution,
    Defense,
}

impl Side {
    /// The complement side.
    pub fn opposite(self) -> Self {
        match self {
            Side::Prosecution => Side::Defense,
            Side::Defense => Side::Prosecution,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Prosecution => write!(f, "prosecution"),
            Side::Defense => write!(f, "defense"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "prosecution" => Ok(Side::Prosecution),
            "defense" => Ok(Side::Defense),
            _ => Err(anyhow::anyhow!("Invalid side: {}", s)),
        }
    }
}

/// Lifecycle status. Archival is terminal and irreversible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Active,
    Archived,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Active => write!(f, "active"),
            MatchStatus::Archived => write!(f, "archived"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_order_is_strictly_increasing() {
        for pair in Stage::ORDER.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn argument_stages_advance_one_stage() {
        assert_eq!(
            ArgumentStage::InitialArguments.next_stage(),
            Stage::EvidencesWitnesses
        );
        assert_eq!(
            ArgumentStage::EvidencesWitnesses.next_stage(),
            Stage::FinalArguments
        );
        assert_eq!(ArgumentStage::FinalArguments.next_stage(), Stage::Judgment);
    }

    #[test]
    fn only_argument_stages_accept_submissions() {
        assert!(ArgumentStage::from_stage(Stage::PendingStake).is_none());
        assert!(ArgumentStage::from_stage(Stage::SideSelection).is_none());
        assert!(ArgumentStage::from_stage(Stage::Judgment).is_none());
        assert!(ArgumentStage::from_stage(Stage::Completed).is_none());
        assert_eq!(
            ArgumentStage::from_stage(Stage::InitialArguments),
            Some(ArgumentStage::InitialArguments)
        );
    }

    #[test]
    fn side_opposite_is_involutive() {
        assert_eq!(Side::Prosecution.opposite(), Side::Defense);
        assert_eq!(Side::Defense.opposite().opposite(), Side::Defense);
    }

    #[test]
    fn side_parses_from_wire_form() {
        assert_eq!("prosecution".parse::<Side>().unwrap(), Side::Prosecution);
        assert!("plaintiff".parse::<Side>().is_err());
    }
}
