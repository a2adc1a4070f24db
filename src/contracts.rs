//! Centralized Contract Message Definitions
//!
//! JSON shapes exchanged with the SNIP-20 tokens, the SecretSwap pair and the
//! reward contract. Variant names serialize in snake_case so an enum value
//! becomes the `{ "variant": { ... } }` object the contracts expect.
//!
//! Nested hook messages (`send.msg`) are JSON encoded as base64 (`Binary`).
//!
//! Created: 2026-10-19

use crate::error::{ZapError, ZapResult};
use crate::types::u256_string;
use alloy::primitives::U256;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ── Binary ───────────────────────────────────────────────────────────

/// Base64 payload as carried in `send.msg`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Binary(pub String);

impl Binary {
    pub fn encode_json<T: Serialize>(msg: &T) -> ZapResult<Self> {
        let json = serde_json::to_vec(msg)
            .map_err(|e| ZapError::invalid(format!("cannot encode hook message: {}", e)))?;
        Ok(Binary(STANDARD.encode(json)))
    }

    pub fn decode_json<T: DeserializeOwned>(&self) -> ZapResult<T> {
        let bytes = STANDARD
            .decode(&self.0)
            .map_err(|e| ZapError::invalid(format!("invalid base64 payload: {}", e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ZapError::invalid(format!("invalid hook message json: {}", e)))
    }
}

// ── Assets ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetInfo {
    Token {
        contract_addr: String,
        token_code_hash: String,
        /// Required by the pair's schema but never read
        #[serde(default)]
        viewing_key: String,
    },
    NativeToken {
        denom: String,
    },
}

impl AssetInfo {
    pub fn token(contract_addr: impl Into<String>, token_code_hash: impl Into<String>) -> Self {
        AssetInfo::Token {
            contract_addr: contract_addr.into(),
            token_code_hash: token_code_hash.into(),
            viewing_key: String::new(),
        }
    }

    pub fn contract_addr(&self) -> Option<&str> {
        match self {
            AssetInfo::Token { contract_addr, .. } => Some(contract_addr),
            AssetInfo::NativeToken { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub info: AssetInfo,
    #[serde(with = "u256_string")]
    pub amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    #[serde(with = "u256_string")]
    pub amount: U256,
}

// ── Pair queries ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairQueryMsg {
    Pool {},
}

/// Answer to `{"pool":{}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolResponse {
    pub assets: Vec<Asset>,
    #[serde(with = "u256_string")]
    pub total_share: U256,
}

// ── Execute messages ─────────────────────────────────────────────────

/// Every handle message the zap emits, across token, pair and reward contracts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleMsg {
    /// SNIP-20 send with a hook payload for the recipient contract
    Send {
        #[serde(with = "u256_string")]
        amount: U256,
        recipient: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        msg: Option<Binary>,
    },
    IncreaseAllowance {
        spender: String,
        #[serde(with = "u256_string")]
        amount: U256,
    },
    ProvideLiquidity {
        assets: [Asset; 2],
    },
}

/// Hook understood by the pair when tokens are sent to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairHookMsg {
    Swap {
        /// The pair aborts the whole transaction if execution would not return exactly this
        #[serde(with = "u256_string")]
        expected_return: U256,
    },
}

/// Hook understood by the reward contract when LP tokens are sent to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardHookMsg {
    Deposit {},
}
