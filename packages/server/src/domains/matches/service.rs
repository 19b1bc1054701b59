//! Match orchestration.
//!
//! Every command follows the same shape: open a transaction, lock the match
//! row, load the snapshot, run the pure transition, persist the patch and any
//! submission, commit, then execute the returned effects. Effects never run
//! inside the transaction; a crash after commit loses at most a notification
//! or a payout retry, never state consistency.

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::common::{ApiError, MatchId, PlayerId};
use crate::domains::cases::Case;
use crate::domains::notifications::Notification;
use crate::domains::players::Player;
use crate::kernel::{ServerDeps, StakeEvent, Verdict};

use super::effects::{Effect, NotificationMessage};
use super::machine::{self, MatchError, MatchEvent, TransitionContext};
use super::models::{Match, StageSubmission};
use super::stage::{ArgumentStage, Side, Stage};
use super::transcript::build_transcript;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMatchInput {
    pub opponent_wallet: String,
    pub stake_amount: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitStageInput {
    pub argument_text: String,
    pub selected_evidences: Option<Vec<String>>,
    pub selected_witnesses: Option<Vec<String>>,
}

/// Full read model for one match.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub match_row: Match,
    pub case: Option<Case>,
    pub submissions: Vec<StageSubmission>,
    pub creator_wallet: String,
    pub opponent_wallet: String,
}

#[derive(Clone)]
pub struct MatchService {
    deps: ServerDeps,
}

impl MatchService {
    pub fn new(deps: ServerDeps) -> Self {
        Self { deps }
    }

    /// Create a match against an existing player and notify them.
    pub async fn create_match(
        &self,
        creator: &Player,
        input: CreateMatchInput,
    ) -> Result<Match, ApiError> {
        if input.stake_amount <= Decimal::ZERO {
            return Err(ApiError::Validation(
                "Stake amount must be positive".to_string(),
            ));
        }
        // Stakes are whole token units; the column would otherwise round.
        if !input.stake_amount.is_integer() {
            return Err(ApiError::Validation(
                "Stake amount must be a whole number in the smallest currency unit".to_string(),
            ));
        }

        let opponent = Player::find_by_wallet(&input.opponent_wallet, &self.deps.db_pool)
            .await?
            .ok_or(ApiError::NotFound("opponent"))?;

        if opponent.id == creator.id {
            return Err(ApiError::Validation(
                "You cannot challenge yourself".to_string(),
            ));
        }

        let onchain_match_id = crate::kernel::generate_onchain_match_id();
        let m = Match::create(
            onchain_match_id,
            creator.id,
            opponent.id,
            input.stake_amount,
            &self.deps.db_pool,
        )
        .await?;

        info!(match_id = %m.id, onchain_match_id = %m.onchain_match_id, "match created");

        self.execute_effects(
            &m,
            vec![Effect::Notify {
                player_id: opponent.id,
                message: NotificationMessage::ChallengeReceived {
                    creator_wallet: creator.wallet_address.clone(),
                    stake_amount: m.stake_amount.to_string(),
                },
            }],
        )
        .await;

        Ok(m)
    }

    pub async fn list_matches(&self, player_id: PlayerId) -> Result<Vec<Match>, ApiError> {
        Ok(Match::list_for_player(player_id, &self.deps.db_pool).await?)
    }

    /// Full aggregate for one match. Participants only.
    pub async fn get_match(
        &self,
        player_id: PlayerId,
        match_id: MatchId,
    ) -> Result<MatchDetail, ApiError> {
        let m = Match::find_by_id(match_id, &self.deps.db_pool)
            .await?
            .ok_or(ApiError::NotFound("match"))?;

        if !m.is_participant(player_id) {
            return Err(MatchError::NotParticipant.into());
        }

        let case = match m.case_id {
            Some(case_id) => Case::find_by_id(case_id, &self.deps.db_pool).await?,
            None => None,
        };
        let submissions = StageSubmission::list_for_match(m.id, &self.deps.db_pool).await?;
        let creator = Player::find_by_id(m.creator_id, &self.deps.db_pool)
            .await?
            .ok_or(ApiError::NotFound("player"))?;
        let opponent = Player::find_by_id(m.opponent_id, &self.deps.db_pool)
            .await?
            .ok_or(ApiError::NotFound("player"))?;

        Ok(MatchDetail {
            match_row: m,
            case,
            submissions,
            creator_wallet: creator.wallet_address,
            opponent_wallet: opponent.wallet_address,
        })
    }

    /// The designated picker chooses a side; the opponent gets the other.
    pub async fn select_side(
        &self,
        player_id: PlayerId,
        match_id: MatchId,
        side: Side,
    ) -> Result<Match, ApiError> {
        let mut tx = self.deps.db_pool.begin().await?;
        let m = Match::find_by_id_locked(match_id, &mut *tx)
            .await?
            .ok_or(ApiError::NotFound("match"))?;

        let ctx = TransitionContext {
            case_pool: &[],
            random: self.deps.random.as_ref(),
        };
        let transition = machine::apply(&m, &[], MatchEvent::SideSelected { player_id, side }, &ctx)?;

        let updated = Match::persist_patch(m.id, &transition.patch, &mut *tx).await?;
        tx.commit().await?;

        self.execute_effects(&updated, transition.effects).await;
        Ok(updated)
    }

    /// Submit for the current argument stage.
    pub async fn submit_stage(
        &self,
        player_id: PlayerId,
        match_id: MatchId,
        input: SubmitStageInput,
    ) -> Result<Match, ApiError> {
        if input.argument_text.trim().is_empty() {
            return Err(ApiError::Validation(
                "Argument text must not be empty".to_string(),
            ));
        }

        let mut tx = self.deps.db_pool.begin().await?;
        let m = Match::find_by_id_locked(match_id, &mut *tx)
            .await?
            .ok_or(ApiError::NotFound("match"))?;

        let submitters = match ArgumentStage::from_stage(m.stage) {
            Some(stage) => StageSubmission::submitters_for_stage(m.id, stage, &mut *tx).await?,
            None => Vec::new(),
        };

        let ctx = TransitionContext {
            case_pool: &[],
            random: self.deps.random.as_ref(),
        };
        let transition = machine::apply(
            &m,
            &submitters,
            MatchEvent::StageSubmitted {
                player_id,
                argument_text: input.argument_text,
                selected_evidences: input.selected_evidences,
                selected_witnesses: input.selected_witnesses,
            },
            &ctx,
        )?;

        if let Some(submission) = &transition.new_submission {
            StageSubmission::insert(m.id, submission, &mut *tx).await?;
        }
        let updated = Match::persist_patch(m.id, &transition.patch, &mut *tx).await?;
        tx.commit().await?;

        self.execute_effects(&updated, transition.effects).await;
        Ok(updated)
    }

    /// Re-run adjudication for a match stuck in `judgment` after a failed
    /// attempt. Participants only. Unlike the auto-trigger this runs inline,
    /// so the caller sees the verdict or the adjudication error directly.
    pub async fn request_judgment(
        &self,
        player_id: PlayerId,
        match_id: MatchId,
    ) -> Result<Match, ApiError> {
        let m = Match::find_by_id(match_id, &self.deps.db_pool)
            .await?
            .ok_or(ApiError::NotFound("match"))?;

        if !m.is_participant(player_id) {
            return Err(MatchError::NotParticipant.into());
        }
        if m.stage != Stage::Judgment {
            return Err(MatchError::WrongStage {
                action: "request judgment",
                stage: m.stage,
            }
            .into());
        }

        self.run_judgment(m.id).await?;
        Match::find_by_id(match_id, &self.deps.db_pool)
            .await?
            .ok_or(ApiError::NotFound("match"))
    }

    /// Ingest one stake confirmation from the chain feed. Unknown matches,
    /// non-party wallets, and duplicates are logged and dropped so the feed
    /// can replay safely.
    pub async fn on_stake(&self, event: StakeEvent) -> Result<(), ApiError> {
        let mut tx = self.deps.db_pool.begin().await?;
        let Some(m) = Match::find_by_onchain_id_locked(&event.onchain_match_id, &mut *tx).await?
        else {
            warn!(onchain_match_id = %event.onchain_match_id, "stake event for unknown match, dropping");
            return Ok(());
        };

        let creator = Player::find_by_id(m.creator_id, &self.deps.db_pool)
            .await?
            .ok_or(ApiError::NotFound("player"))?;
        let opponent = Player::find_by_id(m.opponent_id, &self.deps.db_pool)
            .await?
            .ok_or(ApiError::NotFound("player"))?;

        let Some(role) = m.role_of_wallet(
            &event.wallet_address,
            &creator.wallet_address,
            &opponent.wallet_address,
        ) else {
            warn!(
                match_id = %m.id,
                wallet = %event.wallet_address,
                "stake event from non-party wallet, dropping"
            );
            return Ok(());
        };

        let case_pool = Case::list_ids(&self.deps.db_pool).await?;
        let ctx = TransitionContext {
            case_pool: &case_pool,
            random: self.deps.random.as_ref(),
        };
        let transition = match machine::apply(
            &m,
            &[],
            MatchEvent::StakeConfirmed {
                staker: role,
                staker_wallet: event.wallet_address.clone(),
            },
            &ctx,
        ) {
            Ok(t) => t,
            Err(MatchError::StakeAlreadyConfirmed) => {
                info!(match_id = %m.id, wallet = %event.wallet_address, "duplicate stake event, dropping");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let updated = Match::persist_patch(m.id, &transition.patch, &mut *tx).await?;
        tx.commit().await?;

        info!(match_id = %updated.id, stage = %updated.stage, "stake confirmed");
        if updated.stage == Stage::PendingStake && updated.creator_staked && updated.opponent_staked
        {
            warn!(match_id = %updated.id, "both stakes in but the case catalog is empty; draw retries on the next confirmation");
        }
        self.execute_effects(&updated, transition.effects).await;
        Ok(())
    }

    fn spawn_adjudication(&self, match_id: MatchId) {
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(e) = service.run_judgment(match_id).await {
                error!(match_id = %match_id, error = %e, "adjudication failed");
            }
        });
    }

    /// One adjudication attempt. On judge failure the error is persisted and
    /// the match stays in `judgment` for a later retry.
    pub async fn run_judgment(&self, match_id: MatchId) -> Result<(), ApiError> {
        let m = Match::find_by_id(match_id, &self.deps.db_pool)
            .await?
            .ok_or(ApiError::NotFound("match"))?;
        if m.stage != Stage::Judgment {
            info!(match_id = %m.id, stage = %m.stage, "skipping adjudication, match not awaiting judgment");
            return Ok(());
        }

        let verdict = match self.adjudicate(&m).await {
            Ok(v) => v,
            Err(e) => {
                let message = e.to_string();
                Match::record_judgment_failure(m.id, &message, &self.deps.db_pool).await?;
                return Err(e);
            }
        };

        let mut tx = self.deps.db_pool.begin().await?;
        let m = Match::find_by_id_locked(match_id, &mut *tx)
            .await?
            .ok_or(ApiError::NotFound("match"))?;

        let ctx = TransitionContext {
            case_pool: &[],
            random: self.deps.random.as_ref(),
        };
        let transition = match machine::apply(
            &m,
            &[],
            MatchEvent::VerdictReturned {
                winner_side: verdict.winner,
                judgment: verdict.judgment,
            },
            &ctx,
        ) {
            Ok(t) => t,
            Err(MatchError::WrongStage { .. }) => {
                // A concurrent attempt already completed the match.
                info!(match_id = %m.id, "verdict already recorded, dropping duplicate");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let updated = Match::persist_patch(m.id, &transition.patch, &mut *tx).await?;
        Match::clear_judgment_failure(m.id, &mut *tx).await?;
        tx.commit().await?;

        info!(match_id = %updated.id, winner_id = ?updated.winner_id, "verdict recorded");
        self.execute_effects(&updated, transition.effects).await;
        Ok(())
    }

    async fn adjudicate(&self, m: &Match) -> Result<Verdict, ApiError> {
        let case_id = m.case_id.ok_or(MatchError::CaseNotBound)?;
        let case = Case::find_by_id(case_id, &self.deps.db_pool)
            .await?
            .ok_or(ApiError::NotFound("case"))?;

        let prosecution_id = m
            .player_for_side(Side::Prosecution)
            .ok_or(MatchError::SidesNotBound)?;
        let defense_id = m
            .player_for_side(Side::Defense)
            .ok_or(MatchError::SidesNotBound)?;
        let prosecution = Player::find_by_id(prosecution_id, &self.deps.db_pool)
            .await?
            .ok_or(ApiError::NotFound("player"))?;
        let defense = Player::find_by_id(defense_id, &self.deps.db_pool)
            .await?
            .ok_or(ApiError::NotFound("player"))?;

        let submissions = StageSubmission::list_for_match(m.id, &self.deps.db_pool).await?;
        let transcript = build_transcript(
            &case,
            &prosecution.wallet_address,
            &defense.wallet_address,
            &submissions,
        );

        let verdict = self.deps.adjudicator.adjudicate(&transcript).await?;
        Ok(verdict)
    }

    /// Run a transition's effects after its state change committed. Effects
    /// are best-effort: failures are logged, never propagated.
    async fn execute_effects(&self, m: &Match, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Notify { player_id, message } => {
                    if let Err(e) = Notification::create(
                        player_id,
                        Some(m.id),
                        message.kind(),
                        &message.title(),
                        &message.body(),
                        &self.deps.db_pool,
                    )
                    .await
                    {
                        error!(match_id = %m.id, error = %e, "failed to record notification");
                    }
                }
                Effect::BeginAdjudication => {
                    self.spawn_adjudication(m.id);
                }
                Effect::ReleaseFunds { winner } => {
                    self.release_funds(m, winner).await;
                }
            }
        }
    }

    /// Payout is best-effort: the verdict stands even if the escrow call
    /// fails, and the failure is logged for manual resolution.
    async fn release_funds(&self, m: &Match, winner: PlayerId) {
        let winner_wallet = match Player::find_by_id(winner, &self.deps.db_pool).await {
            Ok(Some(p)) => p.wallet_address,
            Ok(None) => {
                error!(match_id = %m.id, winner_id = %winner, "winner player missing, cannot release funds");
                return;
            }
            Err(e) => {
                error!(match_id = %m.id, error = %e, "failed to load winner for fund release");
                return;
            }
        };

        match self
            .deps
            .chain
            .release_funds(&m.onchain_match_id, &winner_wallet)
            .await
        {
            Ok(()) => {
                info!(match_id = %m.id, winner_wallet = %winner_wallet, "escrow release requested");
            }
            Err(e) => {
                error!(match_id = %m.id, error = %e, "escrow release failed");
            }
        }
    }
}
