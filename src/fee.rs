//! Fee Calculator
//!
//! Converts a gas estimate into a StdFee-shaped fee at a fixed unit price.
//! The amount is `floor(gas * unit_price) + 1` so that truncation can never
//! leave the fee one unit short.
//!
//! Created: 2026-10-19

use crate::contracts::Coin;
use crate::error::{ZapError, ZapResult};
use alloy::primitives::U256;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fee attached to the batch: coins plus the gas limit (as a string on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Vec<Coin>,
    pub gas: String,
}

#[derive(Debug, Clone)]
pub struct FeeCalculator {
    unit_price: Decimal,
    denom: String,
}

impl FeeCalculator {
    pub fn new(unit_price: Decimal, denom: impl Into<String>) -> ZapResult<Self> {
        if unit_price.is_sign_negative() {
            return Err(ZapError::invalid(format!("negative gas price {}", unit_price)));
        }
        let denom = denom.into();
        if denom.trim().is_empty() {
            return Err(ZapError::invalid("fee denom is empty"));
        }
        Ok(Self { unit_price, denom })
    }

    pub fn fee_for(&self, gas: u64) -> ZapResult<Fee> {
        let cost = Decimal::from(gas)
            .checked_mul(self.unit_price)
            .ok_or_else(|| ZapError::invalid("fee overflow"))?;
        let amount = cost
            .floor()
            .to_u128()
            .and_then(|v| v.checked_add(1))
            .ok_or_else(|| ZapError::invalid("fee overflow"))?;

        Ok(Fee {
            amount: vec![Coin {
                denom: self.denom.clone(),
                amount: U256::from(amount),
            }],
            gas: gas.to_string(),
        })
    }
}

/// Per-message gas budget for the five-step zap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasSchedule {
    pub swap: u64,
    pub allowance: u64,
    pub provide_liquidity: u64,
    /// The stake rides on the provide_liquidity budget by default
    pub deposit: u64,
}

impl Default for GasSchedule {
    fn default() -> Self {
        Self {
            swap: 500_000,
            allowance: 100_000,
            provide_liquidity: 400_000,
            deposit: 0,
        }
    }
}

impl GasSchedule {
    /// swap + two allowances + provide + deposit
    pub fn zap_total(&self) -> u64 {
        self.swap
            .saturating_add(self.allowance.saturating_mul(2))
            .saturating_add(self.provide_liquidity)
            .saturating_add(self.deposit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_fee() {
        let calc = FeeCalculator::new(dec!(0.25), "uscrt").unwrap();
        let fee = calc.fee_for(1_100_000).unwrap();
        assert_eq!(fee.gas, "1100000");
        assert_eq!(fee.amount.len(), 1);
        assert_eq!(fee.amount[0].denom, "uscrt");
        assert_eq!(fee.amount[0].amount, U256::from(275_001u64));
    }

    #[test]
    fn test_fractional_cost_rounds_down_then_adds_one() {
        let calc = FeeCalculator::new(dec!(0.25), "uscrt").unwrap();
        // 3 * 0.25 = 0.75 -> 0 + 1
        assert_eq!(calc.fee_for(3).unwrap().amount[0].amount, U256::from(1u64));
        assert_eq!(calc.fee_for(0).unwrap().amount[0].amount, U256::from(1u64));
    }

    #[test]
    fn test_fee_wire_shape() {
        let calc = FeeCalculator::new(dec!(0.25), "uscrt").unwrap();
        let value = serde_json::to_value(calc.fee_for(100_000).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "amount": [{ "denom": "uscrt", "amount": "25001" }], "gas": "100000" })
        );
    }

    #[test]
    fn test_invalid_calculator() {
        assert!(FeeCalculator::new(dec!(-1), "uscrt").is_err());
        assert!(FeeCalculator::new(dec!(0.25), " ").is_err());
    }

    #[test]
    fn test_default_schedule_total() {
        assert_eq!(GasSchedule::default().zap_total(), 1_100_000);
    }
}
