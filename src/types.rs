// Core data structures shared by the simulator, composer and pipeline

use crate::error::{ZapError, ZapResult};
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A deployed contract: bech32 address plus optional code hash.
///
/// Secret contracts accept calls without the hash, but supplying it skips a
/// lookup on the node side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRef {
    pub address: String,
    #[serde(default)]
    pub code_hash: Option<String>,
}

impl ContractRef {
    pub fn new(address: impl Into<String>, code_hash: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            code_hash: Some(code_hash.into()),
        }
    }

    pub fn without_hash(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            code_hash: None,
        }
    }

    /// Fails if the address is blank, or if `require_hash` and the hash is missing/blank.
    pub fn validate(&self, name: &str, require_hash: bool) -> ZapResult<()> {
        if self.address.trim().is_empty() {
            return Err(ZapError::invalid(format!("{} address is empty", name)));
        }
        match self.code_hash.as_deref() {
            Some(hash) if hash.trim().is_empty() => {
                Err(ZapError::invalid(format!("{} code hash is empty", name)))
            }
            None if require_hash => {
                Err(ZapError::invalid(format!("{} code hash is missing", name)))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ContractRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

/// Output of the constant-product swap simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapResult {
    /// Amount the trader receives (commission already deducted)
    pub return_amount: U256,
    pub spread_amount: U256,
    /// Retained by the pool
    pub commission_amount: U256,
}

impl SwapResult {
    /// Return before commission: `return_amount + commission_amount`
    pub fn raw_return(&self) -> U256 {
        self.return_amount + self.commission_amount
    }
}

/// Balanced deposit that follows the swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityPlan {
    pub amount_offer: U256,
    pub amount_ask: U256,
    /// Lower of the two per-asset mint candidates
    pub expected_lp_tokens: U256,
}

/// Serde adapter for integers carried as base-10 strings (CosmWasm `Uint128` style)
pub mod u256_string {
    use alloy::primitives::U256;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    /// Strict decimal parse: digits only, no sign, no hex prefix.
    pub fn parse(raw: &str) -> Result<U256, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("not a base-10 unsigned integer: {:?}", raw));
        }
        U256::from_str_radix(trimmed, 10).map_err(|e| format!("{}: {:?}", e, raw))
    }
}
