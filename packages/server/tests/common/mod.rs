pub mod harness;
pub mod mocks;

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use server_core::domains::cases::{Case, NewCase};
use server_core::domains::players::Player;

pub use harness::TestHarness;

/// Creates a player with a unique wallet.
pub async fn create_player(pool: &PgPool) -> Result<Player> {
    let suffix = Uuid::new_v4().simple().to_string();
    Player::upsert(
        &format!("did:test:{}", suffix),
        &format!("0x{}", &suffix[..20]),
        pool,
    )
    .await
}

/// Ensures at least one catalog case exists and returns the full catalog.
pub async fn ensure_case(pool: &PgPool) -> Result<Case> {
    let case = NewCase {
        title: "The Borrowed Lawnmower".to_string(),
        description: "A neighbor dispute over a lawnmower that came back broken.".to_string(),
        prosecution_brief: "The borrower broke it and hid the damage.".to_string(),
        defense_brief: "It was already failing when lent out.".to_string(),
        evidences: vec![
            "Repair shop estimate".to_string(),
            "Photo of the blade".to_string(),
        ],
        witnesses: vec!["The repair technician".to_string()],
    };
    Case::insert_if_missing(&case, pool).await?;
    let cases = Case::list_all(pool).await?;
    Ok(cases.into_iter().next().expect("catalog seeded"))
}
