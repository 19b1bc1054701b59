//! Match aggregate and stage-submission persistence.
//!
//! The match row is the engine's durable state. Commands load it with
//! `SELECT ... FOR UPDATE` inside a transaction so transitions serialize per
//! match id; the locked variants here take a connection from that
//! transaction.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::{CaseId, MatchId, PlayerId, SubmissionId};

use super::machine::MatchPatch;
use super::stage::{ArgumentStage, MatchStatus, Side, Stage};

/// Match aggregate root.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Match {
    pub id: MatchId,
    /// Externally visible escrow-contract key. Unique, never reused.
    pub onchain_match_id: String,
    pub creator_id: PlayerId,
    pub opponent_id: PlayerId,
    pub case_id: Option<CaseId>,
    /// Exact integer in the smallest currency unit.
    pub stake_amount: Decimal,
    pub creator_staked: bool,
    pub opponent_staked: bool,
    pub side_picker_id: Option<PlayerId>,
    pub prosecution_player_id: Option<PlayerId>,
    pub defense_player_id: Option<PlayerId>,
    pub stage: Stage,
    pub winner_id: Option<PlayerId>,
    pub judgment_text: Option<String>,
    /// Most recent failed adjudication attempt, if any. Cleared on success.
    pub judgment_error: Option<String>,
    pub judgment_failed_at: Option<DateTime<Utc>>,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One player's submission for one argument stage. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StageSubmission {
    pub id: SubmissionId,
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub stage: ArgumentStage,
    /// Derived from the match's side bindings, never chosen at submit time.
    pub side: Side,
    pub argument_text: String,
    pub selected_evidences: Option<Vec<String>>,
    pub selected_witnesses: Option<Vec<String>>,
    pub submitted_at: DateTime<Utc>,
}

impl Match {
    /// Create a new match in `pending_stake`.
    pub async fn create(
        onchain_match_id: String,
        creator_id: PlayerId,
        opponent_id: PlayerId,
        stake_amount: Decimal,
        pool: &PgPool,
    ) -> Result<Self> {
        let m = sqlx::query_as::<_, Match>(
            r#"
            INSERT INTO matches (id, onchain_match_id, creator_id, opponent_id, stake_amount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(MatchId::new())
        .bind(onchain_match_id)
        .bind(creator_id)
        .bind(opponent_id)
        .bind(stake_amount)
        .fetch_one(pool)
        .await?;
        Ok(m)
    }

    /// Find match by ID.
    pub async fn find_by_id(id: MatchId, pool: &PgPool) -> Result<Option<Self>> {
        let m = sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(m)
    }

    /// Find match by ID, holding a row lock for the current transaction.
    pub async fn find_by_id_locked(id: MatchId, conn: &mut PgConnection) -> Result<Option<Self>> {
        let m = sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(m)
    }

    /// Find match by its on-chain key, holding a row lock.
    pub async fn find_by_onchain_id_locked(
        onchain_match_id: &str,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>> {
        let m = sqlx::query_as::<_, Match>(
            "SELECT * FROM matches WHERE onchain_match_id = $1 FOR UPDATE",
        )
        .bind(onchain_match_id)
        .fetch_optional(conn)
        .await?;
        Ok(m)
    }

    /// Matches where the player is creator or opponent, newest first.
    pub async fn list_for_player(player_id: PlayerId, pool: &PgPool) -> Result<Vec<Self>> {
        let matches = sqlx::query_as::<_, Match>(
            r#"
            SELECT * FROM matches
            WHERE creator_id = $1 OR opponent_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(player_id)
        .fetch_all(pool)
        .await?;
        Ok(matches)
    }

    /// Apply a transition's column updates. Unset patch fields keep their
    /// current value; `updated_at` is always touched.
    pub async fn persist_patch(
        id: MatchId,
        patch: &MatchPatch,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        let m = sqlx::query_as::<_, Match>(
            r#"
            UPDATE matches SET
                creator_staked = COALESCE($2, creator_staked),
                opponent_staked = COALESCE($3, opponent_staked),
                case_id = COALESCE($4, case_id),
                side_picker_id = COALESCE($5, side_picker_id),
                prosecution_player_id = COALESCE($6, prosecution_player_id),
                defense_player_id = COALESCE($7, defense_player_id),
                stage = COALESCE($8, stage),
                winner_id = COALESCE($9, winner_id),
                judgment_text = COALESCE($10, judgment_text),
                status = COALESCE($11, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.creator_staked)
        .bind(patch.opponent_staked)
        .bind(patch.case_id)
        .bind(patch.side_picker_id)
        .bind(patch.prosecution_player_id)
        .bind(patch.defense_player_id)
        .bind(patch.stage)
        .bind(patch.winner_id)
        .bind(patch.judgment_text.as_deref())
        .bind(patch.status)
        .fetch_one(conn)
        .await?;
        Ok(m)
    }

    /// Record a failed adjudication attempt; the match stays in `judgment`.
    pub async fn record_judgment_failure(id: MatchId, error: &str, pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE matches
            SET judgment_error = $2, judgment_failed_at = NOW(), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Clear the failure marker after a successful verdict.
    pub async fn clear_judgment_failure(id: MatchId, conn: &mut PgConnection) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE matches
            SET judgment_error = NULL, judgment_failed_at = NULL
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(conn)
        .await?;
        Ok(())
    }
}

/// Insert payload produced by the state machine for a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub player_id: PlayerId,
    pub stage: ArgumentStage,
    pub side: Side,
    pub argument_text: String,
    pub selected_evidences: Option<Vec<String>>,
    pub selected_witnesses: Option<Vec<String>>,
}

impl StageSubmission {
    /// Persist a submission inside the transition's transaction.
    pub async fn insert(
        match_id: MatchId,
        submission: &NewSubmission,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        let s = sqlx::query_as::<_, StageSubmission>(
            r#"
            INSERT INTO stage_submissions (
                id, match_id, player_id, stage, side,
                argument_text, selected_evidences, selected_witnesses
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(SubmissionId::new())
        .bind(match_id)
        .bind(submission.player_id)
        .bind(submission.stage)
        .bind(submission.side)
        .bind(&submission.argument_text)
        .bind(submission.selected_evidences.as_deref())
        .bind(submission.selected_witnesses.as_deref())
        .fetch_one(conn)
        .await?;
        Ok(s)
    }

    /// All submissions for a match, ordered by submission time.
    pub async fn list_for_match(match_id: MatchId, pool: &PgPool) -> Result<Vec<Self>> {
        let submissions = sqlx::query_as::<_, StageSubmission>(
            "SELECT * FROM stage_submissions WHERE match_id = $1 ORDER BY submitted_at",
        )
        .bind(match_id)
        .fetch_all(pool)
        .await?;
        Ok(submissions)
    }

    /// Players who already submitted for a stage, under the match row lock.
    pub async fn submitters_for_stage(
        match_id: MatchId,
        stage: ArgumentStage,
        conn: &mut PgConnection,
    ) -> Result<Vec<PlayerId>> {
        let players = sqlx::query_scalar::<_, PlayerId>(
            "SELECT player_id FROM stage_submissions WHERE match_id = $1 AND stage = $2",
        )
        .bind(match_id)
        .bind(stage)
        .fetch_all(conn)
        .await?;
        Ok(players)
    }
}
