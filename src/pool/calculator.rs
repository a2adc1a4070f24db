//! Swap and Liquidity Calculator
//!
//! Off-chain replica of the SecretSwap pair's integer arithmetic. The swap
//! result is embedded in the transaction as `expected_return`, so every
//! truncation point below must land exactly where the contract's does:
//!
//! ```text
//! cp         = offer_pool * ask_pool
//! raw_return = ask_pool - cp / (offer_pool + offer_amount)
//! spread     = offer_amount * (ask_pool / offer_pool) - raw_return
//! commission = raw_return * commission_rate
//! return     = raw_return - commission
//! ```
//!
//! Created: 2026-10-19

use crate::error::{ZapError, ZapResult};
use crate::pool::PoolSnapshot;
use crate::types::{LiquidityPlan, SwapResult};
use alloy::primitives::U256;
use rust_decimal::Decimal;
use tracing::debug;

/// Fixed-point denominator of the pair contract's `Decimal` (18 places)
pub const DECIMAL_FRACTIONAL: u128 = 1_000_000_000_000_000_000;

fn checked(value: Option<U256>, what: &str) -> ZapResult<U256> {
    value.ok_or_else(|| ZapError::invalid(format!("arithmetic overflow computing {}", what)))
}

/// `amount * rate`, truncated. Exact for any `Decimal` since the rate is
/// applied as `mantissa / 10^scale`.
fn mul_decimal(amount: U256, rate: Decimal) -> ZapResult<U256> {
    if rate.is_sign_negative() {
        return Err(ZapError::invalid(format!("negative rate {}", rate)));
    }
    let numerator = U256::from(rate.mantissa().unsigned_abs());
    let denominator = checked(
        U256::from(10u64).checked_pow(U256::from(rate.scale())),
        "rate scale",
    )?;
    let scaled = checked(amount.checked_mul(numerator), "amount * rate")?;
    Ok(scaled / denominator)
}

/// Constant-product swap simulator with a fixed commission rate
#[derive(Debug, Clone, Copy)]
pub struct SwapSimulator {
    commission_rate: Decimal,
}

impl SwapSimulator {
    /// SecretSwap pairs charge 0.3%
    pub const DEFAULT_COMMISSION_RATE: Decimal = Decimal::from_parts(3, 0, 0, false, 3);

    pub fn new(commission_rate: Decimal) -> ZapResult<Self> {
        if commission_rate.is_sign_negative() || commission_rate >= Decimal::ONE {
            return Err(ZapError::invalid(format!(
                "commission rate {} outside [0, 1)",
                commission_rate
            )));
        }
        Ok(Self { commission_rate })
    }

    pub fn commission_rate(&self) -> Decimal {
        self.commission_rate
    }

    /// Simulate selling `offer_amount` into the pool.
    pub fn simulate(
        &self,
        offer_pool: U256,
        ask_pool: U256,
        offer_amount: U256,
    ) -> ZapResult<SwapResult> {
        if offer_pool.is_zero() || ask_pool.is_zero() {
            return Err(ZapError::invalid("swap against an empty reserve"));
        }
        if offer_amount.is_zero() {
            return Err(ZapError::invalid("swap offer amount is zero"));
        }

        let cp = checked(offer_pool.checked_mul(ask_pool), "offer_pool * ask_pool")?;
        let new_offer_pool = checked(offer_pool.checked_add(offer_amount), "offer_pool + offer")?;
        let raw_return = checked(ask_pool.checked_sub(cp / new_offer_pool), "raw return")?;

        // ask_pool / offer_pool as an 18-place fixed-point ratio
        let ratio = checked(
            ask_pool.checked_mul(U256::from(DECIMAL_FRACTIONAL)),
            "ask_pool ratio",
        )? / offer_pool;
        let spot_return = checked(offer_amount.checked_mul(ratio), "spot return")?
            / U256::from(DECIMAL_FRACTIONAL);
        let spread_amount = spot_return.saturating_sub(raw_return);

        let commission_amount = mul_decimal(raw_return, self.commission_rate)?;
        let return_amount = raw_return - commission_amount;

        debug!(
            "Swap simulation: offer={} pools=({}, {}) raw={} commission={} return={} spread={}",
            offer_amount, offer_pool, ask_pool, raw_return, commission_amount, return_amount, spread_amount
        );

        Ok(SwapResult {
            return_amount,
            spread_amount,
            commission_amount,
        })
    }
}

impl Default for SwapSimulator {
    fn default() -> Self {
        Self {
            commission_rate: Self::DEFAULT_COMMISSION_RATE,
        }
    }
}

/// LP mint estimator for a deposit into a non-empty pool
pub struct LiquidityEstimator;

impl LiquidityEstimator {
    /// LP tokens minted for depositing `(amount_offer, amount_ask)`.
    ///
    /// The pair mints the lower of the two per-asset shares, so an imbalanced
    /// deposit never mints more than its scarcer side justifies.
    pub fn estimate(
        after_swap_offer_pool: U256,
        after_swap_ask_pool: U256,
        amount_offer: U256,
        amount_ask: U256,
        total_lp_supply: U256,
    ) -> ZapResult<U256> {
        if total_lp_supply.is_zero() {
            // First deposit into an empty pool mints by a different rule
            return Err(ZapError::invalid(
                "total LP supply is zero; first deposit into an empty pool is unsupported",
            ));
        }
        if after_swap_offer_pool.is_zero() || after_swap_ask_pool.is_zero() {
            return Err(ZapError::invalid("after-swap reserve is zero"));
        }

        let candidate_ask = checked(
            amount_ask.checked_mul(total_lp_supply),
            "amount_ask * total_lp_supply",
        )? / after_swap_ask_pool;
        let candidate_offer = checked(
            amount_offer.checked_mul(total_lp_supply),
            "amount_offer * total_lp_supply",
        )? / after_swap_offer_pool;

        debug!(
            "LP estimate: candidate_ask={} candidate_offer={}",
            candidate_ask, candidate_offer
        );

        Ok(std::cmp::min(candidate_ask, candidate_offer))
    }

    /// Deposit plan for the half kept back after swapping `offer_amount`.
    ///
    /// The commission stays in the pool, so the ask reserve only drops by the
    /// net return.
    pub fn plan(
        snapshot: &PoolSnapshot,
        offer_amount: U256,
        swap: &SwapResult,
    ) -> ZapResult<LiquidityPlan> {
        let after_swap_offer_pool = checked(
            snapshot.reserve_offer().checked_add(offer_amount),
            "after-swap offer reserve",
        )?;
        let after_swap_ask_pool = checked(
            snapshot.reserve_ask().checked_sub(swap.return_amount),
            "after-swap ask reserve",
        )?;

        let expected_lp_tokens = Self::estimate(
            after_swap_offer_pool,
            after_swap_ask_pool,
            offer_amount,
            swap.return_amount,
            snapshot.total_lp_supply(),
        )?;

        Ok(LiquidityPlan {
            amount_offer: offer_amount,
            amount_ask: swap.return_amount,
            expected_lp_tokens,
        })
    }
}
