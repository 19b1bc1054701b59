//! Server dependencies for the match engine (traits for testability).
//!
//! Central dependency container handed to the orchestration service. External
//! collaborators sit behind trait objects so tests can substitute
//! deterministic doubles.

use sqlx::PgPool;
use std::sync::Arc;

use super::{Adjudicator, ChainBridge, RandomSource};

/// Dependencies accessible to engine commands and effects.
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// Transcript-to-verdict function. External, non-deterministic, fallible.
    pub adjudicator: Arc<dyn Adjudicator>,
    /// Escrow bridge: stake feed in, fund release out.
    pub chain: Arc<dyn ChainBridge>,
    /// Uniform randomness for case draws and the side-picker coin flip.
    pub random: Arc<dyn RandomSource>,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        adjudicator: Arc<dyn Adjudicator>,
        chain: Arc<dyn ChainBridge>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            db_pool,
            adjudicator,
            chain,
            random,
        }
    }
}
