//! Chain transport boundary
//!
//! The pipeline talks to the chain through two traits: one smart query
//! against the pair and one atomic batch submission. Signing, encryption and
//! the actual RPC live behind implementations of these traits.
//!
//! Shipped implementations:
//! - `FilePoolQuerier`: answers the pool query from a captured JSON file
//! - `DryRunSubmitter`: logs and returns the batch without broadcasting
//!
//! Created: 2026-10-19

use crate::compose::{TransactionIntent, ZapStep};
use crate::contracts::{PairQueryMsg, PoolResponse};
use crate::error::{ZapError, ZapResult};
use crate::types::ContractRef;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

#[async_trait]
pub trait PoolQuerier: Send + Sync {
    /// `{"pool":{}}` against the pair contract
    async fn query_pool(&self, pair: &ContractRef) -> ZapResult<PoolResponse>;
}

#[async_trait]
pub trait TxSubmitter: Send + Sync {
    /// Execute every call of the intent as one atomic transaction.
    ///
    /// Implementations map a contract-level execution failure through
    /// [`classify_execution_failure`] so guard trips surface as `StaleQuote`.
    async fn submit(&self, intent: &TransactionIntent) -> ZapResult<SubmitReceipt>;
}

/// Outcome of a submission
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    /// None when nothing was broadcast
    pub tx_hash: Option<String>,
    pub broadcast: bool,
    /// The batch exactly as it was (or would have been) sent
    pub payload: serde_json::Value,
}

/// Reads a pool query answer captured to disk (e.g. from a CLI query)
pub struct FilePoolQuerier {
    path: PathBuf,
}

impl FilePoolQuerier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PoolQuerier for FilePoolQuerier {
    async fn query_pool(&self, pair: &ContractRef) -> ZapResult<PoolResponse> {
        let query = serde_json::to_string(&PairQueryMsg::Pool {})
            .map_err(|e| ZapError::transport("pool query", e))?;
        debug!("Pool query {} on {} answered from {}", query, pair, self.path.display());

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ZapError::transport("pool query", format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| ZapError::transport("pool query", format!("malformed pool response: {}", e)))
    }
}

/// Never broadcasts; useful for inspecting the batch before signing elsewhere
pub struct DryRunSubmitter {
    sender: String,
}

impl DryRunSubmitter {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

#[async_trait]
impl TxSubmitter for DryRunSubmitter {
    async fn submit(&self, intent: &TransactionIntent) -> ZapResult<SubmitReceipt> {
        let payload = serde_json::to_value(intent)
            .map_err(|e| ZapError::transport("submission", e))?;

        info!("🔬 DRY RUN: {} calls from {} (not broadcast)", intent.calls().len(), self.sender);
        for (i, call) in intent.calls().iter().enumerate() {
            let step = ZapStep::from_index(i)
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("#{}", i));
            info!("   {} → {}", step, call.contract_address);
        }

        Ok(SubmitReceipt {
            tx_hash: None,
            broadcast: false,
            payload,
        })
    }
}

/// Map a failed execution's raw log to the error taxonomy.
///
/// The chain reports which message aborted the batch as `message index: N`.
/// A failure at the swap or stake step means the pool moved since the
/// snapshot (the embedded guard tripped); anything else is a plain execution
/// failure.
pub fn classify_execution_failure(raw_log: &str) -> ZapError {
    let step = message_index(raw_log).and_then(ZapStep::from_index);

    match step.and_then(|s| s.guard().map(|g| (s, g))) {
        Some((step, guard)) => ZapError::StaleQuote {
            step: step.to_string(),
            guard: guard.to_string(),
            log: raw_log.to_string(),
        },
        None => {
            let stage = step
                .map(|s| format!("execution of {}", s))
                .unwrap_or_else(|| "execution".to_string());
            ZapError::transport(stage, raw_log)
        }
    }
}

fn message_index(raw_log: &str) -> Option<usize> {
    const MARKER: &str = "message index:";
    let start = raw_log.find(MARKER)? + MARKER.len();
    let digits: String = raw_log[start..]
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
