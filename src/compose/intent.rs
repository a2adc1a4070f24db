//! Finished transaction intent
//!
//! The ordered contract calls, memo and fee handed to the submission layer.
//! There are no setters: an intent only comes out of the composer.
//!
//! Created: 2026-10-19

use crate::contracts::{Coin, HandleMsg};
use crate::fee::Fee;
use serde::Serialize;
use std::fmt;

/// One execute message inside the atomic batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCall {
    pub contract_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_code_hash: Option<String>,
    pub handle_msg: HandleMsg,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_funds: Option<Vec<Coin>>,
}

/// Position of a call in the zap batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZapStep {
    Swap,
    AllowOffer,
    AllowAsk,
    ProvideLiquidity,
    Stake,
}

impl ZapStep {
    /// Execution order
    pub const ALL: [ZapStep; 5] = [
        ZapStep::Swap,
        ZapStep::AllowOffer,
        ZapStep::AllowAsk,
        ZapStep::ProvideLiquidity,
        ZapStep::Stake,
    ];

    pub fn index(&self) -> usize {
        match self {
            ZapStep::Swap => 0,
            ZapStep::AllowOffer => 1,
            ZapStep::AllowAsk => 2,
            ZapStep::ProvideLiquidity => 3,
            ZapStep::Stake => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The simulated amount a failure at this step most likely contradicts
    pub fn guard(&self) -> Option<&'static str> {
        match self {
            ZapStep::Swap => Some("expected_return"),
            ZapStep::Stake => Some("expected_lp_tokens"),
            _ => None,
        }
    }
}

impl fmt::Display for ZapStep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ZapStep::Swap => write!(f, "swap"),
            ZapStep::AllowOffer => write!(f, "allowance(offer)"),
            ZapStep::AllowAsk => write!(f, "allowance(ask)"),
            ZapStep::ProvideLiquidity => write!(f, "provide_liquidity"),
            ZapStep::Stake => write!(f, "deposit"),
        }
    }
}

/// Atomic batch: all calls apply or none do
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionIntent {
    msgs: Vec<ContractCall>,
    memo: String,
    fee: Fee,
}

impl TransactionIntent {
    pub(crate) fn new(msgs: Vec<ContractCall>, memo: String, fee: Fee) -> Self {
        Self { msgs, memo, fee }
    }

    pub fn calls(&self) -> &[ContractCall] {
        &self.msgs
    }

    pub fn call(&self, step: ZapStep) -> Option<&ContractCall> {
        self.msgs.get(step.index())
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn fee(&self) -> &Fee {
        &self.fee
    }
}
