//! In-app notifications.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{MatchId, NotificationId, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    MatchInvitation,
    OpponentStaked,
    CaseAssigned,
    SideAssigned,
    YourTurn,
    OpponentSubmitted,
    VerdictDelivered,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: NotificationId,
    pub player_id: PlayerId,
    pub match_id: Option<MatchId>,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub async fn create(
        player_id: PlayerId,
        match_id: Option<MatchId>,
        kind: NotificationKind,
        title: &str,
        body: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let n = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (id, player_id, match_id, kind, title, body)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(NotificationId::new())
        .bind(player_id)
        .bind(match_id)
        .bind(kind)
        .bind(title)
        .bind(body)
        .fetch_one(pool)
        .await?;
        Ok(n)
    }

    /// A player's notifications, newest first.
    pub async fn list_for_player(
        player_id: PlayerId,
        unread_only: bool,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE player_id = $1 AND ($2 = FALSE OR read = FALSE)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(player_id)
        .bind(unread_only)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(notifications)
    }

    pub async fn unread_count(player_id: PlayerId, pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE player_id = $1 AND read = FALSE",
        )
        .bind(player_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Mark one notification read. Scoped to the owner; returns whether a
    /// row was updated.
    pub async fn mark_read(id: NotificationId, player_id: PlayerId, pool: &PgPool) -> Result<bool> {
        let result =
            sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1 AND player_id = $2")
                .bind(id)
                .bind(player_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_all_read(player_id: PlayerId, pool: &PgPool) -> Result<u64> {
        let result =
            sqlx::query("UPDATE notifications SET read = TRUE WHERE player_id = $1 AND read = FALSE")
                .bind(player_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
