//! The match state machine.
//!
//! `apply` is a pure function of (current state, event) -> (patch, effects).
//! It never touches the database or the network: the orchestration service
//! loads the snapshot under a row lock, runs `apply`, persists the patch, and
//! executes the returned effects after commit. Stage moves only forward; any
//! guard violation rejects the event with a domain error so a concurrent
//! duplicate can never re-apply a transition.

use thiserror::Error;

use crate::common::{ApiError, CaseId, PlayerId};
use crate::kernel::RandomSource;

use super::effects::{Effect, NotificationMessage};
use super::models::{Match, NewSubmission};
use super::roles::Role;
use super::stage::{ArgumentStage, MatchStatus, Side, Stage};

/// Guard violations. Each maps to a caller-facing error class.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("Cannot {action} in current stage: {stage}")]
    WrongStage { action: &'static str, stage: Stage },

    #[error("You are not a player in this match")]
    NotParticipant,

    #[error("You are not the designated side picker")]
    NotSidePicker,

    #[error("You have already submitted for this stage")]
    AlreadySubmitted,

    #[error("Stake already confirmed for this side")]
    StakeAlreadyConfirmed,

    #[error("No cases available in the catalog")]
    NoCasesAvailable,

    #[error("No case bound to this match")]
    CaseNotBound,

    #[error("Sides have not been assigned yet")]
    SidesNotBound,
}

impl From<MatchError> for ApiError {
    fn from(e: MatchError) -> Self {
        match e {
            MatchError::NotParticipant | MatchError::NotSidePicker => {
                ApiError::Forbidden(e.to_string())
            }
            MatchError::WrongStage { .. }
            | MatchError::AlreadySubmitted
            | MatchError::StakeAlreadyConfirmed => ApiError::Validation(e.to_string()),
            MatchError::NoCasesAvailable | MatchError::CaseNotBound | MatchError::SidesNotBound => {
                ApiError::Internal(anyhow::anyhow!(e))
            }
        }
    }
}

/// An inbound event for one match.
#[derive(Debug, Clone)]
pub enum MatchEvent {
    /// A stake confirmation from the chain feed, already resolved to a
    /// participant role by the caller.
    StakeConfirmed {
        staker: Role,
        staker_wallet: String,
    },
    /// The designated side picker chose a side.
    SideSelected { player_id: PlayerId, side: Side },
    /// A player submitted for the current argument stage.
    StageSubmitted {
        player_id: PlayerId,
        argument_text: String,
        selected_evidences: Option<Vec<String>>,
        selected_witnesses: Option<Vec<String>>,
    },
    /// The adjudicator returned a validated verdict.
    VerdictReturned { winner_side: Side, judgment: String },
}

/// Caller-supplied context for transitions that may draw randomness.
pub struct TransitionContext<'a> {
    /// Ids of all catalog cases; only consulted when both stakes complete.
    pub case_pool: &'a [CaseId],
    pub random: &'a dyn RandomSource,
}

/// Column updates produced by a transition. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchPatch {
    pub creator_staked: Option<bool>,
    pub opponent_staked: Option<bool>,
    pub case_id: Option<CaseId>,
    pub side_picker_id: Option<PlayerId>,
    pub prosecution_player_id: Option<PlayerId>,
    pub defense_player_id: Option<PlayerId>,
    pub stage: Option<Stage>,
    pub winner_id: Option<PlayerId>,
    pub judgment_text: Option<String>,
    pub status: Option<MatchStatus>,
}

/// The outcome of a successful transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    pub patch: MatchPatch,
    pub new_submission: Option<NewSubmission>,
    /// Executed by the caller after the state write commits, in order.
    pub effects: Vec<Effect>,
}

/// Applies one event to the match, validating its guard.
///
/// `submitters` are the players who already submitted for the current
/// argument stage (empty outside argument stages).
pub fn apply(
    m: &Match,
    submitters: &[PlayerId],
    event: MatchEvent,
    ctx: &TransitionContext<'_>,
) -> Result<Transition, MatchError> {
    match event {
        MatchEvent::StakeConfirmed {
            staker,
            staker_wallet,
        } => apply_stake(m, staker, staker_wallet, ctx),
        MatchEvent::SideSelected { player_id, side } => apply_side_selection(m, player_id, side),
        MatchEvent::StageSubmitted {
            player_id,
            argument_text,
            selected_evidences,
            selected_witnesses,
        } => apply_submission(
            m,
            submitters,
            player_id,
            argument_text,
            selected_evidences,
            selected_witnesses,
        ),
        MatchEvent::VerdictReturned {
            winner_side,
            judgment,
        } => apply_verdict(m, winner_side, judgment),
    }
}

fn apply_stake(
    m: &Match,
    staker: Role,
    staker_wallet: String,
    ctx: &TransitionContext<'_>,
) -> Result<Transition, MatchError> {
    let (already_staked, other_id) = match staker {
        Role::Creator => (m.creator_staked, m.opponent_id),
        Role::Opponent => (m.opponent_staked, m.creator_id),
    };

    if already_staked {
        // A redelivered confirmation may still complete a match whose case
        // draw was skipped (both flags set, no case bound): retry the draw.
        if m.stage == Stage::PendingStake
            && m.creator_staked
            && m.opponent_staked
            && m.case_id.is_none()
        {
            if ctx.case_pool.is_empty() {
                return Err(MatchError::NoCasesAvailable);
            }
            return Ok(draw_case(m, Transition::default(), ctx));
        }
        return Err(MatchError::StakeAlreadyConfirmed);
    }

    let mut transition = Transition::default();
    match staker {
        Role::Creator => transition.patch.creator_staked = Some(true),
        Role::Opponent => transition.patch.opponent_staked = Some(true),
    }

    transition.effects.push(Effect::Notify {
        player_id: other_id,
        message: NotificationMessage::OpponentStaked { staker_wallet },
    });

    let both_staked = match staker {
        Role::Creator => m.opponent_staked,
        Role::Opponent => m.creator_staked,
    };

    // With an empty catalog the stake flag still commits; the match waits in
    // `pending_stake` and the next confirmation retries the draw.
    if both_staked && !ctx.case_pool.is_empty() {
        transition = draw_case(m, transition, ctx);
    }

    Ok(transition)
}

/// Binds a random case and coin-flips the side picker.
fn draw_case(m: &Match, mut transition: Transition, ctx: &TransitionContext<'_>) -> Transition {
    let case_id = ctx.case_pool[ctx.random.pick_index(ctx.case_pool.len())];
    let picker_id = if ctx.random.coin_flip() {
        m.creator_id
    } else {
        m.opponent_id
    };
    let non_picker_id = if picker_id == m.creator_id {
        m.opponent_id
    } else {
        m.creator_id
    };

    transition.patch.case_id = Some(case_id);
    transition.patch.side_picker_id = Some(picker_id);
    transition.patch.stage = Some(Stage::SideSelection);

    transition.effects.push(Effect::Notify {
        player_id: picker_id,
        message: NotificationMessage::CaseAssigned {
            is_side_picker: true,
        },
    });
    transition.effects.push(Effect::Notify {
        player_id: non_picker_id,
        message: NotificationMessage::CaseAssigned {
            is_side_picker: false,
        },
    });
    transition
}

fn apply_side_selection(
    m: &Match,
    player_id: PlayerId,
    side: Side,
) -> Result<Transition, MatchError> {
    if m.stage != Stage::SideSelection {
        return Err(MatchError::WrongStage {
            action: "select a side",
            stage: m.stage,
        });
    }
    if !m.is_participant(player_id) {
        return Err(MatchError::NotParticipant);
    }
    if m.side_picker_id != Some(player_id) {
        return Err(MatchError::NotSidePicker);
    }

    // The non-picker always gets the complement side.
    let other_id = m
        .other_participant(player_id)
        .ok_or(MatchError::NotParticipant)?;
    let (prosecution_id, defense_id) = match side {
        Side::Prosecution => (player_id, other_id),
        Side::Defense => (other_id, player_id),
    };

    let mut transition = Transition::default();
    transition.patch.prosecution_player_id = Some(prosecution_id);
    transition.patch.defense_player_id = Some(defense_id);
    transition.patch.stage = Some(Stage::InitialArguments);

    for (pid, assigned) in [(prosecution_id, Side::Prosecution), (defense_id, Side::Defense)] {
        transition.effects.push(Effect::Notify {
            player_id: pid,
            message: NotificationMessage::SideAssigned { side: assigned },
        });
    }
    for pid in [prosecution_id, defense_id] {
        transition.effects.push(Effect::Notify {
            player_id: pid,
            message: NotificationMessage::YourTurn {
                stage: ArgumentStage::InitialArguments,
            },
        });
    }

    Ok(transition)
}

fn apply_submission(
    m: &Match,
    submitters: &[PlayerId],
    player_id: PlayerId,
    argument_text: String,
    selected_evidences: Option<Vec<String>>,
    selected_witnesses: Option<Vec<String>>,
) -> Result<Transition, MatchError> {
    let stage = ArgumentStage::from_stage(m.stage).ok_or(MatchError::WrongStage {
        action: "submit",
        stage: m.stage,
    })?;

    // Side is derived from the match bindings, never chosen by the player.
    let side = m.side_of(player_id).ok_or(MatchError::NotParticipant)?;

    if submitters.contains(&player_id) {
        return Err(MatchError::AlreadySubmitted);
    }

    let mut transition = Transition {
        new_submission: Some(NewSubmission {
            player_id,
            stage,
            side,
            argument_text,
            selected_evidences,
            selected_witnesses,
        }),
        ..Default::default()
    };

    let is_second_submission = !submitters.is_empty();
    if is_second_submission {
        let next = stage.next_stage();
        transition.patch.stage = Some(next);

        if next == Stage::Judgment {
            transition.effects.push(Effect::BeginAdjudication);
        } else {
            let next_stage = ArgumentStage::from_stage(next).ok_or(MatchError::WrongStage {
                action: "advance",
                stage: next,
            })?;
            for pid in [m.prosecution_player_id, m.defense_player_id]
                .into_iter()
                .flatten()
            {
                transition.effects.push(Effect::Notify {
                    player_id: pid,
                    message: NotificationMessage::YourTurn { stage: next_stage },
                });
            }
        }
    } else {
        let opponent = m
            .player_for_side(side.opposite())
            .ok_or(MatchError::SidesNotBound)?;
        transition.effects.push(Effect::Notify {
            player_id: opponent,
            message: NotificationMessage::OpponentSubmitted { stage },
        });
    }

    Ok(transition)
}

fn apply_verdict(m: &Match, winner_side: Side, judgment: String) -> Result<Transition, MatchError> {
    if m.stage != Stage::Judgment {
        return Err(MatchError::WrongStage {
            action: "deliver a verdict",
            stage: m.stage,
        });
    }
    if m.case_id.is_none() {
        return Err(MatchError::CaseNotBound);
    }

    let winner = m
        .player_for_side(winner_side)
        .ok_or(MatchError::SidesNotBound)?;
    let loser = m
        .other_participant(winner)
        .ok_or(MatchError::SidesNotBound)?;

    let mut transition = Transition::default();
    transition.patch.winner_id = Some(winner);
    transition.patch.judgment_text = Some(judgment);
    transition.patch.stage = Some(Stage::Completed);
    transition.patch.status = Some(MatchStatus::Archived);

    transition.effects.push(Effect::ReleaseFunds { winner });
    transition.effects.push(Effect::Notify {
        player_id: winner,
        message: NotificationMessage::VerdictDelivered { won: true },
    });
    transition.effects.push(Effect::Notify {
        player_id: loser,
        message: NotificationMessage::VerdictDelivered { won: false },
    });

    Ok(transition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::matches::testing::match_fixture;
    use crate::kernel::FixedRandomSource;

    const RANDOM: FixedRandomSource = FixedRandomSource {
        index: 0,
        flip: true,
    };

    fn ctx_with_cases<'a>(case_pool: &'a [CaseId]) -> TransitionContext<'a> {
        TransitionContext {
            case_pool,
            random: &RANDOM,
        }
    }

    fn stake(staker: Role) -> MatchEvent {
        MatchEvent::StakeConfirmed {
            staker,
            staker_wallet: "0xstaker".to_string(),
        }
    }

    fn submission(player_id: PlayerId) -> MatchEvent {
        MatchEvent::StageSubmitted {
            player_id,
            argument_text: "The facts speak for themselves.".to_string(),
            selected_evidences: None,
            selected_witnesses: None,
        }
    }

    /// Match with both stakes in, sides bound (creator = prosecution).
    fn match_in_stage(stage: Stage) -> Match {
        let mut m = match_fixture();
        m.creator_staked = true;
        m.opponent_staked = true;
        m.case_id = Some(1);
        m.side_picker_id = Some(m.creator_id);
        m.prosecution_player_id = Some(m.creator_id);
        m.defense_player_id = Some(m.opponent_id);
        m.stage = stage;
        m
    }

    #[test]
    fn first_stake_sets_flag_and_notifies_other_side() {
        let m = match_fixture();
        let cases = [7];
        let t = apply(&m, &[], stake(Role::Creator), &ctx_with_cases(&cases)).unwrap();

        assert_eq!(t.patch.creator_staked, Some(true));
        assert_eq!(t.patch.stage, None);
        assert_eq!(t.effects.len(), 1);
        assert!(matches!(
            &t.effects[0],
            Effect::Notify { player_id, message: NotificationMessage::OpponentStaked { .. } }
                if *player_id == m.opponent_id
        ));
    }

    #[test]
    fn second_stake_draws_case_and_picks_side_picker() {
        let mut m = match_fixture();
        m.creator_staked = true;
        let cases = [42];
        let t = apply(&m, &[], stake(Role::Opponent), &ctx_with_cases(&cases)).unwrap();

        assert_eq!(t.patch.opponent_staked, Some(true));
        assert_eq!(t.patch.stage, Some(Stage::SideSelection));
        assert_eq!(t.patch.case_id, Some(42));
        // FixedRandomSource flips heads: creator picks sides.
        assert_eq!(t.patch.side_picker_id, Some(m.creator_id));

        // OpponentStaked + two differentiated CaseAssigned messages.
        assert_eq!(t.effects.len(), 3);
        assert!(t.effects.iter().any(|e| matches!(
            e,
            Effect::Notify { player_id, message: NotificationMessage::CaseAssigned { is_side_picker: true } }
                if *player_id == m.creator_id
        )));
        assert!(t.effects.iter().any(|e| matches!(
            e,
            Effect::Notify { player_id, message: NotificationMessage::CaseAssigned { is_side_picker: false } }
                if *player_id == m.opponent_id
        )));
    }

    #[test]
    fn duplicate_stake_is_rejected() {
        let mut m = match_fixture();
        m.creator_staked = true;
        let cases = [1];
        let err = apply(&m, &[], stake(Role::Creator), &ctx_with_cases(&cases)).unwrap_err();
        assert_eq!(err, MatchError::StakeAlreadyConfirmed);
    }

    #[test]
    fn completing_stakes_with_empty_catalog_keeps_the_stake() {
        let mut m = match_fixture();
        m.creator_staked = true;
        let t = apply(&m, &[], stake(Role::Opponent), &ctx_with_cases(&[])).unwrap();

        // The flag commits; only the case draw waits for a seeded catalog.
        assert_eq!(t.patch.opponent_staked, Some(true));
        assert_eq!(t.patch.stage, None);
        assert_eq!(t.patch.case_id, None);
        assert_eq!(t.effects.len(), 1);
        assert!(matches!(
            &t.effects[0],
            Effect::Notify { message: NotificationMessage::OpponentStaked { .. }, .. }
        ));
    }

    #[test]
    fn redelivered_stake_draws_case_once_catalog_is_seeded() {
        let mut m = match_fixture();
        m.creator_staked = true;
        m.opponent_staked = true;

        // Still empty: the retry reports the missing catalog.
        let err = apply(&m, &[], stake(Role::Creator), &ctx_with_cases(&[])).unwrap_err();
        assert_eq!(err, MatchError::NoCasesAvailable);

        // Seeded: the redelivered event completes the draw without
        // re-touching the flags or re-notifying the stake.
        let cases = [42];
        let t = apply(&m, &[], stake(Role::Creator), &ctx_with_cases(&cases)).unwrap();
        assert_eq!(t.patch.creator_staked, None);
        assert_eq!(t.patch.opponent_staked, None);
        assert_eq!(t.patch.case_id, Some(42));
        assert_eq!(t.patch.stage, Some(Stage::SideSelection));
        assert_eq!(t.effects.len(), 2);
        assert!(t.effects.iter().all(|e| matches!(
            e,
            Effect::Notify { message: NotificationMessage::CaseAssigned { .. }, .. }
        )));
    }

    #[test]
    fn redelivered_stake_with_case_bound_is_rejected() {
        let mut m = match_fixture();
        m.creator_staked = true;
        m.opponent_staked = true;
        m.case_id = Some(1);
        m.stage = Stage::SideSelection;

        let cases = [1];
        let err = apply(&m, &[], stake(Role::Opponent), &ctx_with_cases(&cases)).unwrap_err();
        assert_eq!(err, MatchError::StakeAlreadyConfirmed);
    }

    #[test]
    fn side_picker_choice_binds_complementary_sides() {
        let mut m = match_in_stage(Stage::SideSelection);
        m.prosecution_player_id = None;
        m.defense_player_id = None;
        m.side_picker_id = Some(m.opponent_id);

        let t = apply(
            &m,
            &[],
            MatchEvent::SideSelected {
                player_id: m.opponent_id,
                side: Side::Defense,
            },
            &ctx_with_cases(&[]),
        )
        .unwrap();

        assert_eq!(t.patch.defense_player_id, Some(m.opponent_id));
        assert_eq!(t.patch.prosecution_player_id, Some(m.creator_id));
        assert_eq!(t.patch.stage, Some(Stage::InitialArguments));
        // Two side assignments + two your-turn notifications.
        assert_eq!(t.effects.len(), 4);
    }

    #[test]
    fn non_picker_cannot_select_side() {
        let mut m = match_in_stage(Stage::SideSelection);
        m.side_picker_id = Some(m.creator_id);

        let err = apply(
            &m,
            &[],
            MatchEvent::SideSelected {
                player_id: m.opponent_id,
                side: Side::Prosecution,
            },
            &ctx_with_cases(&[]),
        )
        .unwrap_err();
        assert_eq!(err, MatchError::NotSidePicker);
    }

    #[test]
    fn outsider_cannot_select_side() {
        let m = match_in_stage(Stage::SideSelection);
        let err = apply(
            &m,
            &[],
            MatchEvent::SideSelected {
                player_id: PlayerId::new(),
                side: Side::Prosecution,
            },
            &ctx_with_cases(&[]),
        )
        .unwrap_err();
        assert_eq!(err, MatchError::NotParticipant);
    }

    #[test]
    fn side_selection_requires_side_selection_stage() {
        let m = match_in_stage(Stage::InitialArguments);
        let err = apply(
            &m,
            &[],
            MatchEvent::SideSelected {
                player_id: m.creator_id,
                side: Side::Prosecution,
            },
            &ctx_with_cases(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, MatchError::WrongStage { .. }));
    }

    #[test]
    fn first_submission_notifies_opponent_without_advancing() {
        let m = match_in_stage(Stage::InitialArguments);
        let t = apply(&m, &[], submission(m.creator_id), &ctx_with_cases(&[])).unwrap();

        let sub = t.new_submission.as_ref().unwrap();
        assert_eq!(sub.side, Side::Prosecution);
        assert_eq!(sub.stage, ArgumentStage::InitialArguments);
        assert_eq!(t.patch.stage, None);
        assert!(matches!(
            &t.effects[0],
            Effect::Notify { player_id, message: NotificationMessage::OpponentSubmitted { .. } }
                if *player_id == m.opponent_id
        ));
    }

    #[test]
    fn second_submission_advances_exactly_one_stage() {
        let m = match_in_stage(Stage::InitialArguments);
        let submitters = [m.creator_id];
        let t = apply(&m, &submitters, submission(m.opponent_id), &ctx_with_cases(&[])).unwrap();

        assert_eq!(t.patch.stage, Some(Stage::EvidencesWitnesses));
        // Both players get a your-turn notification for the next stage.
        let turns: Vec<_> = t
            .effects
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    Effect::Notify {
                        message: NotificationMessage::YourTurn {
                            stage: ArgumentStage::EvidencesWitnesses
                        },
                        ..
                    }
                )
            })
            .collect();
        assert_eq!(turns.len(), 2);
    }

    #[test]
    fn duplicate_submission_is_rejected() {
        let m = match_in_stage(Stage::EvidencesWitnesses);
        let submitters = [m.creator_id];
        let err = apply(&m, &submitters, submission(m.creator_id), &ctx_with_cases(&[]))
            .unwrap_err();
        assert_eq!(err, MatchError::AlreadySubmitted);
    }

    #[test]
    fn outsider_cannot_submit() {
        let m = match_in_stage(Stage::InitialArguments);
        let err = apply(&m, &[], submission(PlayerId::new()), &ctx_with_cases(&[])).unwrap_err();
        assert_eq!(err, MatchError::NotParticipant);
    }

    #[test]
    fn submission_outside_argument_stages_is_rejected() {
        for stage in [Stage::PendingStake, Stage::SideSelection, Stage::Judgment, Stage::Completed]
        {
            let m = match_in_stage(stage);
            let err = apply(&m, &[], submission(m.creator_id), &ctx_with_cases(&[])).unwrap_err();
            assert!(matches!(err, MatchError::WrongStage { .. }), "{stage}");
        }
    }

    #[test]
    fn final_submission_enters_judgment_and_triggers_adjudication() {
        let m = match_in_stage(Stage::FinalArguments);
        let submitters = [m.opponent_id];
        let t = apply(&m, &submitters, submission(m.creator_id), &ctx_with_cases(&[])).unwrap();

        assert_eq!(t.patch.stage, Some(Stage::Judgment));
        assert_eq!(t.effects, vec![Effect::BeginAdjudication]);
    }

    #[test]
    fn verdict_maps_winning_side_to_player_and_archives() {
        let m = match_in_stage(Stage::Judgment);
        let t = apply(
            &m,
            &[],
            MatchEvent::VerdictReturned {
                winner_side: Side::Defense,
                judgment: "The court finds for the defense.".to_string(),
            },
            &ctx_with_cases(&[]),
        )
        .unwrap();

        // Defense is the opponent in this fixture.
        assert_eq!(t.patch.winner_id, Some(m.opponent_id));
        assert_eq!(t.patch.stage, Some(Stage::Completed));
        assert_eq!(t.patch.status, Some(MatchStatus::Archived));
        assert!(t.effects.contains(&Effect::ReleaseFunds {
            winner: m.opponent_id
        }));
        assert!(t.effects.iter().any(|e| matches!(
            e,
            Effect::Notify { player_id, message: NotificationMessage::VerdictDelivered { won: true } }
                if *player_id == m.opponent_id
        )));
        assert!(t.effects.iter().any(|e| matches!(
            e,
            Effect::Notify { player_id, message: NotificationMessage::VerdictDelivered { won: false } }
                if *player_id == m.creator_id
        )));
    }

    #[test]
    fn verdict_requires_judgment_stage() {
        let m = match_in_stage(Stage::FinalArguments);
        let err = apply(
            &m,
            &[],
            MatchEvent::VerdictReturned {
                winner_side: Side::Prosecution,
                judgment: "x".to_string(),
            },
            &ctx_with_cases(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, MatchError::WrongStage { .. }));
    }

    #[test]
    fn verdict_requires_bound_case() {
        let mut m = match_in_stage(Stage::Judgment);
        m.case_id = None;
        let err = apply(
            &m,
            &[],
            MatchEvent::VerdictReturned {
                winner_side: Side::Prosecution,
                judgment: "x".to_string(),
            },
            &ctx_with_cases(&[]),
        )
        .unwrap_err();
        assert_eq!(err, MatchError::CaseNotBound);
    }

    #[test]
    fn stage_never_moves_backward() {
        // Every transition that sets a stage sets one strictly ahead of the
        // snapshot it was computed from.
        let mut m = match_fixture();
        m.creator_staked = true;
        let cases = [1];
        let t = apply(&m, &[], stake(Role::Opponent), &ctx_with_cases(&cases)).unwrap();
        assert!(t.patch.stage.unwrap() > m.stage);

        for stage in [
            Stage::InitialArguments,
            Stage::EvidencesWitnesses,
            Stage::FinalArguments,
        ] {
            let m = match_in_stage(stage);
            let submitters = [m.creator_id];
            let t =
                apply(&m, &submitters, submission(m.opponent_id), &ctx_with_cases(&[])).unwrap();
            assert!(t.patch.stage.unwrap() > m.stage);
        }

        let m = match_in_stage(Stage::Judgment);
        let t = apply(
            &m,
            &[],
            MatchEvent::VerdictReturned {
                winner_side: Side::Prosecution,
                judgment: "x".to_string(),
            },
            &ctx_with_cases(&[]),
        )
        .unwrap();
        assert!(t.patch.stage.unwrap() > m.stage);
    }

    #[test]
    fn completed_match_rejects_every_event() {
        let m = match_in_stage(Stage::Completed);
        let cases = [1];

        assert!(apply(&m, &[], stake(Role::Creator), &ctx_with_cases(&cases)).is_err());
        assert!(apply(
            &m,
            &[],
            MatchEvent::SideSelected {
                player_id: m.creator_id,
                side: Side::Prosecution
            },
            &ctx_with_cases(&cases)
        )
        .is_err());
        assert!(apply(&m, &[], submission(m.creator_id), &ctx_with_cases(&cases)).is_err());
        assert!(apply(
            &m,
            &[],
            MatchEvent::VerdictReturned {
                winner_side: Side::Prosecution,
                judgment: "x".to_string()
            },
            &ctx_with_cases(&cases)
        )
        .is_err());
    }
}
