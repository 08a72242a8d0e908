//! Request, quote, and outcome types for a single swap-and-bridge.

use std::fmt;

use alloy::primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};

use crate::error::OrchestratorError;
use crate::redact::Redacted;

/// Slug of the built-in Arbitrum One profile
pub const ARBITRUM_ONE: &str = "arbitrum_one";
/// Slug of the built-in Optimism profile
pub const OPTIMISM: &str = "optimism";

/// Static description of a source network the bridge is deployed on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
    pub slug: String,
    pub rpc_url: String,
    /// Native EVM chain id, used when signing
    pub chain_id: u64,
    /// Swappable bridge contract (swapAndBridge entry point)
    pub bridge_address: Address,
    /// Wrapped native asset used as the quoter's input token
    pub weth_address: Address,
}

/// One account's bridge job.
#[derive(Debug, Clone)]
pub struct AccountRequest {
    pub private_key: Redacted<String>,
    pub network: String,
    /// Decimal amount in the network's native unit, e.g. `"0.25"`
    pub amount: String,
    /// Fraction of the quoted output accepted as minimum, within (0, 1]
    pub slippage: f64,
}

impl AccountRequest {
    pub fn new(
        private_key: impl Into<String>,
        network: impl Into<String>,
        amount: impl Into<String>,
        slippage: f64,
    ) -> Self {
        Self {
            private_key: Redacted::new(private_key.into()),
            network: network.into(),
            amount: amount.into(),
            slippage,
        }
    }
}

/// Fresh on-chain quote for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteResult {
    /// LayerZero native messaging fee, in wei
    pub messaging_fee: U256,
    /// Expected destination-token output of the WETH swap
    pub estimated_out: U256,
}

/// EIP-1559 fee parameters for one transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasPlan {
    pub base_fee: u128,
    pub priority_fee: u128,
    pub max_fee: u128,
}

/// Terminal result of processing one account
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionOutcome {
    /// Broadcast, receipt not awaited
    Submitted(TxHash),
    Confirmed(TxHash),
    Reverted(TxHash),
    Failed(OrchestratorError),
}

impl TransactionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionOutcome::Submitted(_) => "submitted",
            TransactionOutcome::Confirmed(_) => "confirmed",
            TransactionOutcome::Reverted(_) => "reverted",
            TransactionOutcome::Failed(_) => "failed",
        }
    }

    /// Hash of the broadcast transaction, if one was sent
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            TransactionOutcome::Submitted(h)
            | TransactionOutcome::Confirmed(h)
            | TransactionOutcome::Reverted(h) => Some(*h),
            TransactionOutcome::Failed(OrchestratorError::Reverted { tx_hash })
            | TransactionOutcome::Failed(OrchestratorError::ConfirmationTimeout {
                tx_hash, ..
            }) => Some(*tx_hash),
            TransactionOutcome::Failed(_) => None,
        }
    }

    /// Collapse into a `Result`, treating a revert as an error
    pub fn into_result(self) -> Result<TxHash, OrchestratorError> {
        match self {
            TransactionOutcome::Submitted(h) | TransactionOutcome::Confirmed(h) => Ok(h),
            TransactionOutcome::Reverted(tx_hash) => Err(OrchestratorError::Reverted { tx_hash }),
            TransactionOutcome::Failed(e) => Err(e),
        }
    }
}

impl fmt::Display for TransactionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionOutcome::Failed(e) => write!(f, "failed: {}", e),
            other => match other.tx_hash() {
                Some(h) => write!(f, "{} {}", other.as_str(), h),
                None => f.write_str(other.as_str()),
            },
        }
    }
}
