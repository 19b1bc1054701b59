//! Legal case catalog.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::CaseId;

/// A fictional legal scenario from the catalog. Immutable once seeded.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Case {
    pub id: CaseId,
    pub title: String,
    pub description: String,
    pub prosecution_brief: String,
    pub defense_brief: String,
    /// Catalog of evidence items players may select from.
    pub evidences: Vec<String>,
    /// Catalog of witnesses players may call.
    pub witnesses: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for seeding.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCase {
    pub title: String,
    pub description: String,
    pub prosecution_brief: String,
    pub defense_brief: String,
    pub evidences: Vec<String>,
    pub witnesses: Vec<String>,
}

impl Case {
    pub async fn find_by_id(id: CaseId, pool: &PgPool) -> Result<Option<Self>> {
        let case = sqlx::query_as::<_, Case>("SELECT * FROM cases WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(case)
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>> {
        let cases = sqlx::query_as::<_, Case>("SELECT * FROM cases ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(cases)
    }

    /// Ids of every catalog case, for random assignment.
    pub async fn list_ids(pool: &PgPool) -> Result<Vec<CaseId>> {
        let ids = sqlx::query_scalar::<_, CaseId>("SELECT id FROM cases ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(ids)
    }

    /// Seed one case, skipping titles that already exist.
    pub async fn insert_if_missing(case: &NewCase, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO cases (title, description, prosecution_brief, defense_brief, evidences, witnesses)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (title) DO NOTHING
            "#,
        )
        .bind(&case.title)
        .bind(&case.description)
        .bind(&case.prosecution_brief)
        .bind(&case.defense_brief)
        .bind(&case.evidences)
        .bind(&case.witnesses)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
