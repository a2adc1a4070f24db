//! Pool module for the zap bot
//!
//! Point-in-time pool state and the off-chain replica of the pair's swap
//! and LP mint arithmetic.
//!
//! Created: 2026-10-19

pub mod calculator;
pub mod state;

pub use calculator::{LiquidityEstimator, SwapSimulator, DECIMAL_FRACTIONAL};
pub use state::PoolSnapshot;
