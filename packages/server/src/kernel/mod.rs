//! Infrastructure adapters and dependency wiring.

pub mod adjudicator;
pub mod chain;
pub mod deps;
pub mod random;

pub use adjudicator::{parse_verdict, AdjudicationError, Adjudicator, OpenRouterAdjudicator, Verdict};
pub use chain::{generate_onchain_match_id, ChainBridge, ChainError, EscrowRelayBridge, StakeEvent};
pub use deps::ServerDeps;
pub use random::{FixedRandomSource, RandomSource, ThreadRngSource};
