//! Transaction composition
//!
//! Turns simulated amounts into an ordered, atomic batch of contract calls.
//!
//! Created: 2026-10-19

pub mod builder;
pub mod intent;

pub use builder::{compose_zap, TransactionComposer};
pub use intent::{ContractCall, TransactionIntent, ZapStep};
