//! On-chain escrow bridge adapter.
//!
//! Inbound: a duplicate-tolerant feed of stake confirmations, delivered
//! serially over a channel. Outbound: a single fund-release instruction keyed
//! by the opaque on-chain match id and the winner's wallet address.
//!
//! The production implementation talks to an escrow relay service over HTTP:
//! the relay watches the contract's `Staked` events and holds the oracle key
//! that signs `resolve` transactions. The engine never blocks a state commit
//! on the bridge; release failures are logged and reconciled out of band.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("bridge unreachable: {0}")]
    Transport(String),

    #[error("bridge rejected instruction: {0}")]
    Rejected(String),
}

/// A stake confirmation observed on-chain.
#[derive(Debug, Clone, Deserialize)]
pub struct StakeEvent {
    /// Opaque escrow-contract match identifier (`0x` + 64 hex chars).
    pub onchain_match_id: String,
    /// Wallet address of the staking party.
    pub wallet_address: String,
    /// Staked amount in the smallest currency unit.
    pub amount: Decimal,
}

/// Boundary to the escrow contract.
#[async_trait]
pub trait ChainBridge: Send + Sync {
    /// Subscribes to the stake-confirmation feed. Events arrive serially per
    /// feed but may interleave across matches.
    async fn subscribe_stakes(&self) -> Result<mpsc::Receiver<StakeEvent>, ChainError>;

    /// Instructs the escrow to release both stakes to the winner.
    async fn release_funds(
        &self,
        onchain_match_id: &str,
        winner_wallet: &str,
    ) -> Result<(), ChainError>;
}

/// HTTP client for the escrow relay service.
pub struct EscrowRelayBridge {
    client: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
}

#[derive(Deserialize)]
struct EventBatch {
    events: Vec<StakeEvent>,
    cursor: u64,
}

impl EscrowRelayBridge {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            poll_interval: Duration::from_secs(5),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    async fn fetch_events(&self, cursor: u64) -> Result<EventBatch, ChainError> {
        let url = format!("{}/stake-events?after={}", self.base_url, cursor);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ChainError::Transport(format!(
                "relay returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ChainError::Transport(format!("malformed event batch: {}", e)))
    }
}

#[async_trait]
impl ChainBridge for EscrowRelayBridge {
    async fn subscribe_stakes(&self) -> Result<mpsc::Receiver<StakeEvent>, ChainError> {
        let (tx, rx) = mpsc::channel(64);

        let bridge = EscrowRelayBridge {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            poll_interval: self.poll_interval,
        };

        tokio::spawn(async move {
            let mut cursor = 0u64;
            loop {
                match bridge.fetch_events(cursor).await {
                    Ok(batch) => {
                        cursor = batch.cursor;
                        for event in batch.events {
                            if tx.send(event).await.is_err() {
                                tracing::info!("Stake event receiver dropped, stopping poll loop");
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        // Transient relay failures are expected; keep polling.
                        tracing::warn!(error = %e, "Failed to poll stake events");
                    }
                }
                tokio::time::sleep(bridge.poll_interval).await;
            }
        });

        Ok(rx)
    }

    async fn release_funds(
        &self,
        onchain_match_id: &str,
        winner_wallet: &str,
    ) -> Result<(), ChainError> {
        let url = format!("{}/resolve", self.base_url);
        let body = json!({
            "onchain_match_id": onchain_match_id,
            "winner_wallet": winner_wallet,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ChainError::Rejected(format!("{}: {}", status, detail)));
        }

        tracing::info!(
            onchain_match_id,
            winner_wallet,
            "Fund release confirmed by relay"
        );
        Ok(())
    }
}

/// Generates a fresh on-chain match id: `0x` followed by 32 random bytes in
/// hex, matching the contract's bytes32 key. Collisions are negligible, and
/// the unique index on the matches table is the final guard.
pub fn generate_onchain_match_id() -> String {
    use rand::RngCore;

    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn onchain_id_has_bytes32_shape() {
        let id = generate_onchain_match_id();
        assert!(id.starts_with("0x"));
        assert_eq!(id.len(), 66);
        assert!(id[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn onchain_ids_are_unique() {
        assert_ne!(generate_onchain_match_id(), generate_onchain_match_id());
    }

    #[test]
    fn stake_event_deserializes() {
        let event: StakeEvent = serde_json::from_str(
            r#"{"onchain_match_id": "0xabc", "wallet_address": "0xdef", "amount": "1000000"}"#,
        )
        .unwrap();
        assert_eq!(event.amount, Decimal::from(1_000_000));
    }
}
