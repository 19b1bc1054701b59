//! Deterministic doubles for the external collaborators.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tokio::sync::mpsc;

use server_core::domains::matches::Side;
use server_core::kernel::{
    AdjudicationError, Adjudicator, ChainBridge, ChainError, FixedRandomSource, ServerDeps,
    StakeEvent, Verdict,
};

/// Returns scripted outcomes in order. Once the script is exhausted every
/// further call fails with a transport error.
pub struct ScriptedAdjudicator {
    script: Mutex<VecDeque<Result<Verdict, AdjudicationError>>>,
}

impl ScriptedAdjudicator {
    pub fn new(script: Vec<Result<Verdict, AdjudicationError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }

    /// Always returns the same verdict.
    pub fn always(winner: Side) -> Self {
        Self::new((0..16).map(|_| Ok(verdict_for(winner))).collect())
    }
}

pub fn verdict_for(winner: Side) -> Verdict {
    Verdict {
        winner,
        judgment: "Having weighed the arguments, the court rules accordingly.".to_string(),
        reasoning: "One side argued better.".to_string(),
    }
}

#[async_trait]
impl Adjudicator for ScriptedAdjudicator {
    async fn adjudicate(&self, _transcript: &str) -> Result<Verdict, AdjudicationError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AdjudicationError::Transport("script exhausted".to_string())))
    }
}

/// Records release instructions instead of calling out. The stake feed is an
/// empty channel; tests push stake events straight into the service.
pub struct RecordingChainBridge {
    pub releases: Mutex<Vec<(String, String)>>,
    pub fail_releases: bool,
}

impl RecordingChainBridge {
    pub fn new() -> Self {
        Self {
            releases: Mutex::new(Vec::new()),
            fail_releases: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            releases: Mutex::new(Vec::new()),
            fail_releases: true,
        }
    }

    pub fn recorded_releases(&self) -> Vec<(String, String)> {
        self.releases.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainBridge for RecordingChainBridge {
    async fn subscribe_stakes(&self) -> Result<mpsc::Receiver<StakeEvent>, ChainError> {
        let (_tx, rx) = mpsc::channel(1);
        Ok(rx)
    }

    async fn release_funds(
        &self,
        onchain_match_id: &str,
        winner_wallet: &str,
    ) -> Result<(), ChainError> {
        if self.fail_releases {
            return Err(ChainError::Transport("relay down".to_string()));
        }
        self.releases
            .lock()
            .unwrap()
            .push((onchain_match_id.to_string(), winner_wallet.to_string()));
        Ok(())
    }
}

/// Deps with deterministic randomness: first case in the pool, creator picks
/// sides.
pub fn test_deps(
    pool: PgPool,
    adjudicator: Arc<dyn Adjudicator>,
    chain: Arc<dyn ChainBridge>,
) -> ServerDeps {
    ServerDeps::new(
        pool,
        adjudicator,
        chain,
        Arc::new(FixedRandomSource {
            index: 0,
            flip: true,
        }),
    )
}

pub fn stake_event(onchain_match_id: &str, wallet: &str) -> StakeEvent {
    StakeEvent {
        onchain_match_id: onchain_match_id.to_string(),
        wallet_address: wallet.to_string(),
        amount: Decimal::from(1_000_000u64),
    }
}
