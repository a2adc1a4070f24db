//! Configuration management
//!
//! Everything the pipeline needs (endpoint, sender, contract registry,
//! pricing, gas schedule) comes from one TOML file and is passed in
//! explicitly. The library never reads process environment.
//!
//! Created: 2026-10-19

use crate::error::{ZapError, ZapResult};
use crate::fee::{FeeCalculator, GasSchedule};
use crate::pool::SwapSimulator;
use crate::types::{u256_string, ContractRef};
use alloy::primitives::U256;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Top-level TOML configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct ZapConfig {
    pub network: NetworkConfig,
    pub contracts: ContractRegistry,
    pub zap: ZapSettings,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub gas: GasSchedule,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    pub endpoint: String,
    pub chain_id: String,
    /// Address the batch is executed from
    pub sender: String,
    /// Per round trip; unset means the caller imposes none
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Every contract the zap touches
#[derive(Debug, Clone, Deserialize)]
pub struct ContractRegistry {
    pub offer_token: ContractRef,
    pub ask_token: ContractRef,
    pub pair: ContractRef,
    pub lp_token: ContractRef,
    /// Reward contract; its code hash is optional
    pub staking: ContractRef,
}

impl ContractRegistry {
    pub fn validate(&self) -> ZapResult<()> {
        self.offer_token.validate("offer_token", true)?;
        self.ask_token.validate("ask_token", true)?;
        self.pair.validate("pair", true)?;
        self.lp_token.validate("lp_token", true)?;
        self.staking.validate("staking", false)?;
        if self.offer_token.address == self.ask_token.address {
            return Err(ZapError::invalid("offer and ask token are the same contract"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZapSettings {
    /// Total offer-token amount to invest; half is swapped, half deposited
    #[serde(with = "u256_string")]
    pub total_offer_amount: U256,
    #[serde(default)]
    pub memo: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_commission_rate")]
    pub commission_rate: Decimal,
    #[serde(default = "default_gas_price")]
    pub gas_price: Decimal,
    #[serde(default = "default_fee_denom")]
    pub fee_denom: String,
}

fn default_commission_rate() -> Decimal { SwapSimulator::DEFAULT_COMMISSION_RATE }
fn default_gas_price() -> Decimal { Decimal::new(25, 2) }
fn default_fee_denom() -> String { "uscrt".to_string() }

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            commission_rate: default_commission_rate(),
            gas_price: default_gas_price(),
            fee_denom: default_fee_denom(),
        }
    }
}

impl ZapConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).with_context(|| "Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ZapResult<()> {
        if self.network.endpoint.trim().is_empty() {
            return Err(ZapError::Config("network.endpoint is empty".into()));
        }
        if self.network.sender.trim().is_empty() {
            return Err(ZapError::Config("network.sender is empty".into()));
        }
        self.contracts
            .validate()
            .map_err(|e| ZapError::Config(e.to_string()))?;
        if self.offer_split().0.is_zero() {
            return Err(ZapError::Config(format!(
                "zap.total_offer_amount {} too small to split",
                self.zap.total_offer_amount
            )));
        }
        self.simulator().map_err(|e| ZapError::Config(e.to_string()))?;
        self.fee_calculator()
            .map_err(|e| ZapError::Config(e.to_string()))?;
        Ok(())
    }

    /// `(half, remainder)` of the configured total. The half is both swapped
    /// and deposited; an odd unit stays in the wallet.
    pub fn offer_split(&self) -> (U256, U256) {
        let two = U256::from(2u64);
        (
            self.zap.total_offer_amount / two,
            self.zap.total_offer_amount % two,
        )
    }

    pub fn simulator(&self) -> ZapResult<SwapSimulator> {
        SwapSimulator::new(self.pricing.commission_rate)
    }

    pub fn fee_calculator(&self) -> ZapResult<FeeCalculator> {
        FeeCalculator::new(self.pricing.gas_price, self.pricing.fee_denom.clone())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.network.timeout_ms.map(Duration::from_millis)
    }
}

/// Convenience wrapper used by the binary
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ZapConfig> {
    ZapConfig::load(path)
}
