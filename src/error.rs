//! Per-account failure taxonomy.

use std::time::Duration;

use alloy::primitives::TxHash;
use thiserror::Error;

/// Reason a single account could not be bridged.
///
/// Every variant aborts the current account only; the batch moves on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrchestratorError {
    #[error("Network {0} is not supported")]
    UnsupportedNetwork(String),

    #[error("RPC for network {network} is unreachable")]
    Unreachable { network: String },

    #[error("Invalid slippage {0}: must be within (0, 1]")]
    InvalidSlippage(f64),

    #[error("Invalid bridge amount {amount:?}: {reason}")]
    InvalidAmount { amount: String, reason: String },

    #[error("Quote unavailable: {0}")]
    QuoteUnavailable(String),

    #[error("Node query failed: {0}")]
    NodeQuery(String),

    #[error("Signing failed: {0}")]
    SigningFailure(String),

    #[error("Broadcast failed: {0}")]
    BroadcastFailure(String),

    #[error("Transaction {tx_hash} reverted")]
    Reverted { tx_hash: TxHash },

    #[error("Transaction {tx_hash} not confirmed after {timeout:?}")]
    ConfirmationTimeout { tx_hash: TxHash, timeout: Duration },
}

impl OrchestratorError {
    /// Whether re-running the same request later could plausibly succeed.
    ///
    /// Nothing in this crate retries on its own; this is for callers.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OrchestratorError::Unreachable { .. }
                | OrchestratorError::QuoteUnavailable(_)
                | OrchestratorError::NodeQuery(_)
                | OrchestratorError::BroadcastFailure(_)
                | OrchestratorError::ConfirmationTimeout { .. }
        )
    }
}
