//! Player records keyed by wallet address and identity subject.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::PlayerId;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Player {
    pub id: PlayerId,
    /// Checksummed or lowercased EVM address. Unique.
    pub wallet_address: String,
    /// Stable subject claim from the identity provider. Unique.
    pub identity_subject: String,
    pub created_at: DateTime<Utc>,
}

impl Player {
    pub async fn find_by_id(id: PlayerId, pool: &PgPool) -> Result<Option<Self>> {
        let player = sqlx::query_as::<_, Player>("SELECT * FROM players WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(player)
    }

    /// Case-insensitive wallet lookup.
    pub async fn find_by_wallet(wallet_address: &str, pool: &PgPool) -> Result<Option<Self>> {
        let player = sqlx::query_as::<_, Player>(
            "SELECT * FROM players WHERE LOWER(wallet_address) = LOWER($1)",
        )
        .bind(wallet_address)
        .fetch_optional(pool)
        .await?;
        Ok(player)
    }

    /// Get or create the player for a verified identity. The wallet is
    /// refreshed on conflict in case the provider rotated it.
    pub async fn upsert(
        identity_subject: &str,
        wallet_address: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let player = sqlx::query_as::<_, Player>(
            r#"
            INSERT INTO players (id, wallet_address, identity_subject)
            VALUES ($1, $2, $3)
            ON CONFLICT (identity_subject)
            DO UPDATE SET wallet_address = EXCLUDED.wallet_address
            RETURNING *
            "#,
        )
        .bind(PlayerId::new())
        .bind(wallet_address)
        .bind(identity_subject)
        .fetch_one(pool)
        .await?;
        Ok(player)
    }
}
