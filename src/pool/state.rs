//! Pool Snapshot
//!
//! Typed, validated view of one `{"pool":{}}` query result, oriented so that
//! the offer token's reserve comes first regardless of the order the pair
//! returned its assets in.
//!
//! Created: 2026-10-19

use crate::contracts::PoolResponse;
use crate::error::{ZapError, ZapResult};
use alloy::primitives::U256;
use tracing::debug;

/// Reserves and LP supply at query time. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSnapshot {
    reserve_offer: U256,
    reserve_ask: U256,
    total_lp_supply: U256,
}

impl PoolSnapshot {
    /// Both reserves must be non-zero. A zero LP supply is representable here
    /// but rejected by the liquidity estimator.
    pub fn new(reserve_offer: U256, reserve_ask: U256, total_lp_supply: U256) -> ZapResult<Self> {
        if reserve_offer.is_zero() {
            return Err(ZapError::invalid("offer reserve is zero"));
        }
        if reserve_ask.is_zero() {
            return Err(ZapError::invalid("ask reserve is zero"));
        }
        Ok(Self {
            reserve_offer,
            reserve_ask,
            total_lp_supply,
        })
    }

    /// Pick the offer/ask reserves out of a pair query answer by token address.
    pub fn from_response(
        response: &PoolResponse,
        offer_token: &str,
        ask_token: &str,
    ) -> ZapResult<Self> {
        if response.assets.len() != 2 {
            return Err(ZapError::transport(
                "pool query",
                format!("expected 2 assets, got {}", response.assets.len()),
            ));
        }

        let reserve_of = |token: &str| {
            response
                .assets
                .iter()
                .find(|a| a.info.contract_addr() == Some(token))
                .map(|a| a.amount)
                .ok_or_else(|| {
                    ZapError::transport("pool query", format!("token {} not in pool", token))
                })
        };

        let reserve_offer = reserve_of(offer_token)?;
        let reserve_ask = reserve_of(ask_token)?;

        debug!(
            "Pool snapshot: offer={} ask={} total_share={}",
            reserve_offer, reserve_ask, response.total_share
        );

        Self::new(reserve_offer, reserve_ask, response.total_share)
    }

    pub fn reserve_offer(&self) -> U256 {
        self.reserve_offer
    }

    pub fn reserve_ask(&self) -> U256 {
        self.reserve_ask
    }

    pub fn total_lp_supply(&self) -> U256 {
        self.total_lp_supply
    }
}
