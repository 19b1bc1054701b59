// Court Clash - adjudication game backend
//
// Two players stake into an on-chain escrow, argue a randomly assigned legal
// case over three stages, and an AI judge decides who takes the pot.
//
// Domains own their models and services; the kernel holds the ports to the
// outside world (judge, escrow, randomness).

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
