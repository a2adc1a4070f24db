//! DEX Zap Bot Library
//!
//! Swap half of a token into a SecretSwap constant-product pair, provide
//! both halves as liquidity and stake the LP tokens, as one atomic batch.
//! The pair's integer arithmetic is replicated off-chain so the simulated
//! return can be embedded as a hard `expected_return` guard.
//!
//! Created: 2026-10-19

pub mod client;
pub mod compose;
pub mod config;
pub mod contracts;
pub mod error;
pub mod fee;
pub mod pipeline;
pub mod pool;
pub mod types;

// Re-export commonly used types
pub use client::{DryRunSubmitter, FilePoolQuerier, PoolQuerier, TxSubmitter};
pub use compose::{compose_zap, TransactionComposer, TransactionIntent};
pub use config::{load_config, ZapConfig};
pub use error::{ZapError, ZapResult};
pub use fee::{FeeCalculator, GasSchedule};
pub use pipeline::{ZapPipeline, ZapPlan};
pub use pool::{LiquidityEstimator, PoolSnapshot, SwapSimulator};
pub use types::{ContractRef, LiquidityPlan, SwapResult};
