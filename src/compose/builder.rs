//! Zap Transaction Composer
//!
//! Builds the five-call atomic batch from simulated amounts:
//! swap → allowance(offer) → allowance(ask) → provide_liquidity → deposit.
//!
//! Each stage consumes the previous one and only exposes the next step, so a
//! batch with allowances after the provide, or a stake before the swap, cannot
//! be written down. Amounts are never read back from chain; the swap's
//! `expected_return` and the staked LP amount are the guards.
//!
//! Created: 2026-10-19

use super::intent::{ContractCall, TransactionIntent};
use crate::config::ContractRegistry;
use crate::contracts::{Asset, AssetInfo, Binary, HandleMsg, PairHookMsg, RewardHookMsg};
use crate::error::{ZapError, ZapResult};
use crate::fee::Fee;
use crate::types::{ContractRef, LiquidityPlan, SwapResult};
use alloy::primitives::U256;
use tracing::debug;

fn call(contract: &ContractRef, handle_msg: HandleMsg) -> ContractCall {
    ContractCall {
        contract_address: contract.address.clone(),
        contract_code_hash: contract.code_hash.clone(),
        handle_msg,
        sent_funds: None,
    }
}

fn asset_info(token: &ContractRef) -> AssetInfo {
    AssetInfo::token(
        token.address.clone(),
        token.code_hash.clone().unwrap_or_default(),
    )
}

fn require_positive(amount: U256, what: &str) -> ZapResult<()> {
    if amount.is_zero() {
        return Err(ZapError::invalid(format!("{} is zero", what)));
    }
    Ok(())
}

/// Entry point; holds the validated registry
#[derive(Debug, Clone, Copy)]
pub struct TransactionComposer<'a> {
    registry: &'a ContractRegistry,
}

impl<'a> TransactionComposer<'a> {
    pub fn new(registry: &'a ContractRegistry) -> ZapResult<Self> {
        registry.validate()?;
        Ok(Self { registry })
    }

    /// Step 1: send `offer_amount` to the pair with a swap hook pinned to the
    /// simulated net return.
    pub fn swap(self, offer_amount: U256, swap: &SwapResult) -> ZapResult<Swapped<'a>> {
        require_positive(offer_amount, "offer amount")?;
        require_positive(swap.return_amount, "simulated return")?;

        let hook = Binary::encode_json(&PairHookMsg::Swap {
            expected_return: swap.return_amount,
        })?;
        let msg = call(
            &self.registry.offer_token,
            HandleMsg::Send {
                amount: offer_amount,
                recipient: self.registry.pair.address.clone(),
                msg: Some(hook),
            },
        );

        Ok(Swapped {
            registry: self.registry,
            offer_amount,
            ask_amount: swap.return_amount,
            calls: vec![msg],
        })
    }
}

/// Swap queued
#[derive(Debug)]
pub struct Swapped<'a> {
    registry: &'a ContractRegistry,
    offer_amount: U256,
    ask_amount: U256,
    calls: Vec<ContractCall>,
}

impl<'a> Swapped<'a> {
    /// Steps 2-3: let the pair pull the kept-back offer half and the swap proceeds.
    pub fn grant_allowances(self) -> Allowed<'a> {
        let spender = self.registry.pair.address.clone();
        let mut calls = self.calls;
        calls.push(call(
            &self.registry.offer_token,
            HandleMsg::IncreaseAllowance {
                spender: spender.clone(),
                amount: self.offer_amount,
            },
        ));
        calls.push(call(
            &self.registry.ask_token,
            HandleMsg::IncreaseAllowance {
                spender,
                amount: self.ask_amount,
            },
        ));

        Allowed {
            registry: self.registry,
            offer_amount: self.offer_amount,
            ask_amount: self.ask_amount,
            calls,
        }
    }
}

/// Allowances queued
#[derive(Debug)]
pub struct Allowed<'a> {
    registry: &'a ContractRegistry,
    offer_amount: U256,
    ask_amount: U256,
    calls: Vec<ContractCall>,
}

impl<'a> Allowed<'a> {
    /// Step 4: deposit exactly `(offer_amount, return_amount)`. The plan must
    /// describe that same deposit.
    pub fn provide_liquidity(self, plan: &LiquidityPlan) -> ZapResult<Provided<'a>> {
        if plan.amount_offer != self.offer_amount || plan.amount_ask != self.ask_amount {
            return Err(ZapError::invalid(format!(
                "liquidity plan ({}, {}) does not match swap ({}, {})",
                plan.amount_offer, plan.amount_ask, self.offer_amount, self.ask_amount
            )));
        }
        require_positive(plan.expected_lp_tokens, "expected LP tokens")?;

        let mut calls = self.calls;
        calls.push(call(
            &self.registry.pair,
            HandleMsg::ProvideLiquidity {
                assets: [
                    Asset {
                        info: asset_info(&self.registry.offer_token),
                        amount: self.offer_amount,
                    },
                    Asset {
                        info: asset_info(&self.registry.ask_token),
                        amount: self.ask_amount,
                    },
                ],
            },
        ));

        Ok(Provided {
            registry: self.registry,
            lp_amount: plan.expected_lp_tokens,
            calls,
        })
    }
}

/// Liquidity provision queued
#[derive(Debug)]
pub struct Provided<'a> {
    registry: &'a ContractRegistry,
    lp_amount: U256,
    calls: Vec<ContractCall>,
}

impl<'a> Provided<'a> {
    /// Step 5: send the expected LP amount to the reward contract. Fails on
    /// chain if fewer LP tokens were minted than simulated.
    pub fn stake(self) -> ZapResult<Staked> {
        let hook = Binary::encode_json(&RewardHookMsg::Deposit {})?;
        let mut calls = self.calls;
        calls.push(call(
            &self.registry.lp_token,
            HandleMsg::Send {
                amount: self.lp_amount,
                recipient: self.registry.staking.address.clone(),
                msg: Some(hook),
            },
        ));
        Ok(Staked { calls })
    }
}

/// All five calls queued
#[derive(Debug)]
pub struct Staked {
    calls: Vec<ContractCall>,
}

impl Staked {
    pub fn finish(self, memo: impl Into<String>, fee: Fee) -> TransactionIntent {
        debug!("Composed zap batch: {} calls, gas {}", self.calls.len(), fee.gas);
        TransactionIntent::new(self.calls, memo.into(), fee)
    }
}

/// Compose the full zap in one go.
pub fn compose_zap(
    registry: &ContractRegistry,
    offer_amount: U256,
    swap: &SwapResult,
    plan: &LiquidityPlan,
    memo: impl Into<String>,
    fee: Fee,
) -> ZapResult<TransactionIntent> {
    Ok(TransactionComposer::new(registry)?
        .swap(offer_amount, swap)?
        .grant_allowances()
        .provide_liquidity(plan)?
        .stake()?
        .finish(memo, fee))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::ZapStep;
    use crate::config::tests::sample_config;
    use crate::contracts::Coin;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    fn reference_swap() -> SwapResult {
        SwapResult {
            return_amount: u(181_274),
            spread_amount: u(18_181),
            commission_amount: u(545),
        }
    }

    fn reference_plan() -> LiquidityPlan {
        LiquidityPlan {
            amount_offer: u(100_000),
            amount_ask: u(181_274),
            expected_lp_tokens: u(909_090),
        }
    }

    fn fee() -> Fee {
        Fee {
            amount: vec![Coin {
                denom: "uscrt".into(),
                amount: u(275_001),
            }],
            gas: "1100000".into(),
        }
    }

    #[test]
    fn test_emits_five_calls_in_fixed_order() {
        let config = sample_config();
        let registry = &config.contracts;
        let intent =
            compose_zap(registry, u(100_000), &reference_swap(), &reference_plan(), "", fee())
                .unwrap();

        let calls = intent.calls();
        assert_eq!(calls.len(), 5);

        let targets: Vec<&str> = calls.iter().map(|c| c.contract_address.as_str()).collect();
        assert_eq!(
            targets,
            vec![
                registry.offer_token.address.as_str(),
                registry.offer_token.address.as_str(),
                registry.ask_token.address.as_str(),
                registry.pair.address.as_str(),
                registry.lp_token.address.as_str(),
            ]
        );

        assert!(matches!(calls[ZapStep::Swap.index()].handle_msg, HandleMsg::Send { .. }));
        assert!(matches!(calls[1].handle_msg, HandleMsg::IncreaseAllowance { .. }));
        assert!(matches!(calls[2].handle_msg, HandleMsg::IncreaseAllowance { .. }));
        assert!(matches!(calls[3].handle_msg, HandleMsg::ProvideLiquidity { .. }));
        assert!(matches!(calls[4].handle_msg, HandleMsg::Send { .. }));
    }

    #[test]
    fn test_swap_hook_pins_expected_return() {
        let config = sample_config();
        let intent = compose_zap(
            &config.contracts,
            u(100_000),
            &reference_swap(),
            &reference_plan(),
            "",
            fee(),
        )
        .unwrap();

        match &intent.call(ZapStep::Swap).unwrap().handle_msg {
            HandleMsg::Send { amount, recipient, msg } => {
                assert_eq!(*amount, u(100_000));
                assert_eq!(recipient, &config.contracts.pair.address);
                let hook: PairHookMsg = msg.as_ref().unwrap().decode_json().unwrap();
                assert_eq!(hook, PairHookMsg::Swap { expected_return: u(181_274) });
            }
            other => panic!("unexpected swap message: {:?}", other),
        }
    }

    #[test]
    fn test_amounts_flow_into_allowances_provide_and_stake() {
        let config = sample_config();
        let intent = compose_zap(
            &config.contracts,
            u(100_000),
            &reference_swap(),
            &reference_plan(),
            "zap",
            fee(),
        )
        .unwrap();
        let json = serde_json::to_value(&intent).unwrap();
        let msgs = &json["msgs"];

        assert_eq!(msgs[1]["handleMsg"]["increase_allowance"]["amount"], "100000");
        assert_eq!(msgs[2]["handleMsg"]["increase_allowance"]["amount"], "181274");
        assert_eq!(msgs[2]["handleMsg"]["increase_allowance"]["spender"], config.contracts.pair.address);

        let assets = &msgs[3]["handleMsg"]["provide_liquidity"]["assets"];
        assert_eq!(assets[0]["amount"], "100000");
        assert_eq!(assets[0]["info"]["token"]["contract_addr"], config.contracts.offer_token.address);
        assert_eq!(assets[0]["info"]["token"]["viewing_key"], "");
        assert_eq!(assets[1]["amount"], "181274");

        assert_eq!(msgs[4]["handleMsg"]["send"]["amount"], "909090");
        assert_eq!(msgs[4]["handleMsg"]["send"]["recipient"], config.contracts.staking.address);
        assert_eq!(msgs[4]["handleMsg"]["send"]["msg"], "eyJkZXBvc2l0Ijp7fX0=");
        assert_eq!(
            msgs[4]["contractCodeHash"],
            config.contracts.lp_token.code_hash.clone().unwrap()
        );
        assert!(msgs[4].get("sentFunds").is_none());
        assert_eq!(json["memo"], "zap");
        assert_eq!(json["fee"]["gas"], "1100000");
    }

    #[test]
    fn test_rejects_zero_amounts() {
        let config = sample_config();
        let composer = TransactionComposer::new(&config.contracts).unwrap();
        assert!(composer.swap(U256::ZERO, &reference_swap()).is_err());

        let mut plan = reference_plan();
        plan.expected_lp_tokens = U256::ZERO;
        let err = compose_zap(&config.contracts, u(100_000), &reference_swap(), &plan, "", fee())
            .unwrap_err();
        assert!(matches!(err, ZapError::InvalidInput { .. }));
    }

    #[test]
    fn test_rejects_plan_that_disagrees_with_swap() {
        let config = sample_config();
        let mut plan = reference_plan();
        plan.amount_ask = u(181_819);
        assert!(compose_zap(&config.contracts, u(100_000), &reference_swap(), &plan, "", fee())
            .is_err());
    }

    #[test]
    fn test_rejects_missing_identifier() {
        let mut config = sample_config();
        config.contracts.pair.code_hash = None;
        assert!(TransactionComposer::new(&config.contracts).is_err());
    }
}
