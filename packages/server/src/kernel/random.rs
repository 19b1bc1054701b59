//! Injected randomness for case draws and the side-picker coin flip.
//!
//! The engine never reaches for a global RNG directly; it takes a
//! `RandomSource` so tests can supply deterministic draws.

use rand::Rng;

/// A uniform source of randomness for the match engine.
pub trait RandomSource: Send + Sync {
    /// Picks an index uniformly in `0..len`. `len` must be non-zero.
    fn pick_index(&self, len: usize) -> usize;

    /// Uniform coin flip.
    fn coin_flip(&self) -> bool;
}

/// Production source backed by the thread-local RNG.
#[derive(Default, Clone, Copy)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn pick_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }

    fn coin_flip(&self) -> bool {
        rand::thread_rng().gen_bool(0.5)
    }
}

/// Deterministic source for tests: returns fixed answers.
#[derive(Clone, Copy)]
pub struct FixedRandomSource {
    pub index: usize,
    pub flip: bool,
}

impl RandomSource for FixedRandomSource {
    fn pick_index(&self, len: usize) -> usize {
        self.index.min(len.saturating_sub(1))
    }

    fn coin_flip(&self) -> bool {
        self.flip
    }
}
