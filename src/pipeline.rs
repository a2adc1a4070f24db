//! Zap Pipeline
//!
//! One planning cycle: query the pair, simulate the swap and the deposit,
//! compose the guarded batch, submit it once. Nothing is retried; after any
//! failure the caller re-plans from a fresh snapshot.
//!
//! Created: 2026-10-19

use crate::client::{PoolQuerier, SubmitReceipt, TxSubmitter};
use crate::compose::{compose_zap, TransactionIntent};
use crate::config::ZapConfig;
use crate::error::{ZapError, ZapResult};
use crate::pool::{LiquidityEstimator, PoolSnapshot};
use crate::types::{LiquidityPlan, SwapResult};
use alloy::primitives::U256;
use chrono::{DateTime, Utc};
use std::future::Future;
use tracing::{error, info, warn};

/// Everything derived from one snapshot
#[derive(Debug, Clone)]
pub struct ZapPlan {
    pub planned_at: DateTime<Utc>,
    pub snapshot: PoolSnapshot,
    /// Swapped and deposited (half the configured total)
    pub offer_amount: U256,
    /// Odd unit left in the wallet by the split
    pub remainder: U256,
    pub swap: SwapResult,
    pub liquidity: LiquidityPlan,
    pub gas: u64,
    pub intent: TransactionIntent,
}

pub struct ZapPipeline<Q, S> {
    config: ZapConfig,
    querier: Q,
    submitter: S,
}

impl<Q: PoolQuerier, S: TxSubmitter> ZapPipeline<Q, S> {
    pub fn new(config: ZapConfig, querier: Q, submitter: S) -> Self {
        Self {
            config,
            querier,
            submitter,
        }
    }

    pub fn config(&self) -> &ZapConfig {
        &self.config
    }

    async fn round_trip<T, F>(&self, stage: &str, fut: F) -> ZapResult<T>
    where
        F: Future<Output = ZapResult<T>>,
    {
        match self.config.timeout() {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| ZapError::transport(stage, format!("timed out after {:?}", limit)))?,
            None => fut.await,
        }
    }

    /// Query the pair and orient the reserves as offer/ask.
    pub async fn snapshot(&self) -> ZapResult<PoolSnapshot> {
        let contracts = &self.config.contracts;
        info!("Querying pool {}", contracts.pair);
        let response = self
            .round_trip("pool query", self.querier.query_pool(&contracts.pair))
            .await?;
        PoolSnapshot::from_response(
            &response,
            &contracts.offer_token.address,
            &contracts.ask_token.address,
        )
    }

    /// Pure part of the cycle: simulate and compose from a snapshot.
    pub fn plan_from_snapshot(&self, snapshot: PoolSnapshot) -> ZapResult<ZapPlan> {
        let (offer_amount, remainder) = self.config.offer_split();
        if !remainder.is_zero() {
            warn!("Odd total; {} unit(s) of the offer token stay in the wallet", remainder);
        }

        let swap = self.config.simulator()?.simulate(
            snapshot.reserve_offer(),
            snapshot.reserve_ask(),
            offer_amount,
        )?;
        let liquidity = LiquidityEstimator::plan(&snapshot, offer_amount, &swap)?;

        let gas = self.config.gas.zap_total();
        let fee = self.config.fee_calculator()?.fee_for(gas)?;
        let intent = compose_zap(
            &self.config.contracts,
            offer_amount,
            &swap,
            &liquidity,
            self.config.zap.memo.clone(),
            fee,
        )?;

        info!(
            "📋 Plan: swap {} → expect {} (commission {}, spread {}), provide ({}, {}) → {} LP, gas {}",
            offer_amount,
            swap.return_amount,
            swap.commission_amount,
            swap.spread_amount,
            liquidity.amount_offer,
            liquidity.amount_ask,
            liquidity.expected_lp_tokens,
            gas
        );

        Ok(ZapPlan {
            planned_at: Utc::now(),
            snapshot,
            offer_amount,
            remainder,
            swap,
            liquidity,
            gas,
            intent,
        })
    }

    pub async fn plan(&self) -> ZapResult<ZapPlan> {
        let snapshot = self.snapshot().await?;
        self.plan_from_snapshot(snapshot)
    }

    /// Submit a plan's batch once.
    pub async fn execute(&self, plan: &ZapPlan) -> ZapResult<SubmitReceipt> {
        let result = self
            .round_trip("submission", self.submitter.submit(&plan.intent))
            .await;

        match &result {
            Ok(receipt) if receipt.broadcast => {
                info!("✅ Zap submitted: {}", receipt.tx_hash.as_deref().unwrap_or("<no hash>"));
            }
            Ok(_) => info!("Zap composed, not broadcast"),
            Err(e @ ZapError::StaleQuote { .. }) => {
                warn!("Batch aborted, pool moved since {}: {}", plan.planned_at, e);
            }
            Err(e) => error!("Submission failed: {}", e),
        }
        result
    }

    /// Plan then submit.
    pub async fn run(&self) -> ZapResult<(ZapPlan, SubmitReceipt)> {
        let plan = self.plan().await?;
        let receipt = self.execute(&plan).await?;
        Ok((plan, receipt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::classify_execution_failure;
    use crate::compose::ZapStep;
    use crate::config::tests::sample_config;
    use crate::contracts::{Asset, AssetInfo, HandleMsg, PoolResponse};
    use crate::types::ContractRef;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    struct FixedPool {
        response: PoolResponse,
    }

    #[async_trait]
    impl PoolQuerier for FixedPool {
        async fn query_pool(&self, _pair: &ContractRef) -> ZapResult<PoolResponse> {
            Ok(self.response.clone())
        }
    }

    struct SlowPool;

    #[async_trait]
    impl PoolQuerier for SlowPool {
        async fn query_pool(&self, _pair: &ContractRef) -> ZapResult<PoolResponse> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(ZapError::transport("pool query", "unreachable"))
        }
    }

    /// Records submissions; optionally fails with a raw chain log
    #[derive(Default)]
    struct RecordingSubmitter {
        submissions: AtomicUsize,
        last: Mutex<Option<TransactionIntent>>,
        fail_with: Option<String>,
    }

    #[async_trait]
    impl TxSubmitter for RecordingSubmitter {
        async fn submit(&self, intent: &TransactionIntent) -> ZapResult<SubmitReceipt> {
            self.submissions.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(intent.clone());
            if let Some(log) = &self.fail_with {
                return Err(classify_execution_failure(log));
            }
            Ok(SubmitReceipt {
                tx_hash: Some("ABCDEF".into()),
                broadcast: true,
                payload: serde_json::to_value(intent).unwrap(),
            })
        }
    }

    /// Reference pool, with the ask token listed first
    fn reference_pool(config: &ZapConfig) -> PoolResponse {
        let c = &config.contracts;
        PoolResponse {
            assets: vec![
                Asset {
                    info: AssetInfo::token(c.ask_token.address.clone(), "h"),
                    amount: u(2_000_000),
                },
                Asset {
                    info: AssetInfo::token(c.offer_token.address.clone(), "h"),
                    amount: u(1_000_000),
                },
            ],
            total_share: u(10_000_000),
        }
    }

    fn pipeline(
        submitter: RecordingSubmitter,
    ) -> ZapPipeline<FixedPool, RecordingSubmitter> {
        let config = sample_config();
        let response = reference_pool(&config);
        ZapPipeline::new(config, FixedPool { response }, submitter)
    }

    #[test]
    fn test_plan_reproduces_reference_numbers() {
        let pipeline = pipeline(RecordingSubmitter::default());
        let plan = tokio_test::block_on(pipeline.plan()).unwrap();

        assert_eq!(plan.offer_amount, u(100_000));
        assert_eq!(plan.remainder, U256::ZERO);
        assert_eq!(plan.swap.return_amount, u(181_274));
        assert_eq!(plan.swap.commission_amount, u(545));
        assert_eq!(plan.liquidity.expected_lp_tokens, u(909_090));
        assert_eq!(plan.gas, 1_100_000);
        assert_eq!(plan.intent.fee().amount[0].amount, u(275_001));
        assert_eq!(plan.intent.calls().len(), 5);
    }

    #[test]
    fn test_run_submits_exactly_once() {
        let pipeline = pipeline(RecordingSubmitter::default());
        let (plan, receipt) = tokio_test::block_on(pipeline.run()).unwrap();

        assert!(receipt.broadcast);
        assert_eq!(pipeline.submitter.submissions.load(Ordering::SeqCst), 1);
        let sent = pipeline.submitter.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent, plan.intent);
    }

    #[test]
    fn test_guard_trip_surfaces_as_stale_quote_without_retry() {
        let submitter = RecordingSubmitter {
            fail_with: Some("failed to execute message; message index: 0: encrypted: xyz".into()),
            ..Default::default()
        };
        let pipeline = pipeline(submitter);
        let err = tokio_test::block_on(pipeline.run()).unwrap_err();

        assert!(matches!(err, ZapError::StaleQuote { .. }));
        assert!(err.is_retryable_with_replan());
        assert_eq!(pipeline.submitter.submissions.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_snapshot_never_submits() {
        let config = sample_config();
        let mut response = reference_pool(&config);
        response.assets[1].amount = U256::ZERO;
        let pipeline = ZapPipeline::new(config, FixedPool { response }, RecordingSubmitter::default());

        let err = tokio_test::block_on(pipeline.run()).unwrap_err();
        assert!(matches!(err, ZapError::InvalidInput { .. }));
        assert_eq!(pipeline.submitter.submissions.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_pool_is_rejected() {
        let config = sample_config();
        let mut response = reference_pool(&config);
        response.total_share = U256::ZERO;
        let pipeline = ZapPipeline::new(config, FixedPool { response }, RecordingSubmitter::default());

        assert!(matches!(
            tokio_test::block_on(pipeline.plan()),
            Err(ZapError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_query_timeout_is_transport_failure() {
        let mut config = sample_config();
        config.network.timeout_ms = Some(10);
        let pipeline = ZapPipeline::new(config, SlowPool, RecordingSubmitter::default());

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let err = rt.block_on(pipeline.plan()).unwrap_err();
        assert!(matches!(err, ZapError::Transport { ref stage, .. } if stage == "pool query"));
    }

    #[test]
    fn test_dry_run_against_example_files() {
        use crate::client::{DryRunSubmitter, FilePoolQuerier};

        let config = ZapConfig::from_toml_str(include_str!("../config/zap.example.toml")).unwrap();
        let pool_file = concat!(env!("CARGO_MANIFEST_DIR"), "/data/pool.example.json");
        let sender = config.network.sender.clone();
        let pipeline = ZapPipeline::new(
            config,
            FilePoolQuerier::new(pool_file),
            DryRunSubmitter::new(sender),
        );

        let (plan, receipt) = tokio_test::block_on(pipeline.run()).unwrap();
        assert!(!receipt.broadcast);
        assert!(receipt.tx_hash.is_none());
        assert_eq!(receipt.payload["msgs"].as_array().unwrap().len(), 5);

        // 5_000_000 offered into a 1_000_000 / 2_000_000 pool
        assert_eq!(plan.swap.raw_return(), u(1_666_667));
        assert_eq!(plan.swap.commission_amount, u(5_000));
        assert_eq!(plan.swap.return_amount, u(1_661_667));
        assert_eq!(plan.liquidity.expected_lp_tokens, u(8_333_333));
    }

    #[test]
    fn test_swap_step_carries_planned_return() {
        let pipeline = pipeline(RecordingSubmitter::default());
        let plan = tokio_test::block_on(pipeline.plan()).unwrap();

        match &plan.intent.call(ZapStep::AllowAsk).unwrap().handle_msg {
            HandleMsg::IncreaseAllowance { amount, .. } => assert_eq!(*amount, plan.swap.return_amount),
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
