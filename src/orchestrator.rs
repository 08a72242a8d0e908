//! Per-account swap-and-bridge orchestration
//!
//! [`Orchestrator::process`] runs one account from network lookup to
//! receipt:
//!
//! 1. Resolve the network profile and its RPC client (no I/O)
//! 2. Probe the node; bail out with `Unreachable` before anything else
//! 3. Derive the sender, validate amount and slippage
//! 4. Fetch the LayerZero fee and the Uniswap quote concurrently
//! 5. `minOut = floor(quote * slippage)`
//! 6. EIP-1559 fees from the latest base fee
//! 7. Build `swapAndBridge` with `value = amount + fee`
//! 8. Read the nonce, sign locally, broadcast
//! 9. Poll for the receipt until the confirmation deadline
//!
//! Nothing is retried. Each call broadcasts at most one transaction.

use std::collections::HashMap;

use alloy::{
    eips::eip2718::Encodable2718,
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, TxHash, U256},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use tracing::{debug, error, info, warn};

use crate::config::{BridgeSettings, Config, GasLimitStrategy};
use crate::contracts;
use crate::error::OrchestratorError;
use crate::pricing::{buffered_gas_limit, parse_amount, Slippage};
use crate::rpc::{EvmRpc, HttpRpc};
use crate::types::{AccountRequest, GasPlan, NetworkProfile, QuoteResult, TransactionOutcome};

/// Drives one swap-and-bridge per [`AccountRequest`]
pub struct Orchestrator<R> {
    config: Config,
    clients: HashMap<String, R>,
}

impl Orchestrator<HttpRpc> {
    /// Orchestrator with an HTTP client for every configured network
    pub fn connect(config: Config) -> eyre::Result<Self> {
        let clients = HttpRpc::for_networks(&config)?;
        Ok(Self::new(config, clients))
    }
}

impl<R: EvmRpc> Orchestrator<R> {
    /// `clients` maps network slug to the node client used for that network
    pub fn new(config: Config, clients: HashMap<String, R>) -> Self {
        Self { config, clients }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process one account and log the outcome. Never panics, never retries.
    pub async fn process(&self, request: &AccountRequest) -> TransactionOutcome {
        match self.try_process(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                match sender_address(request.private_key.expose()) {
                    Some(address) => error!(
                        address = %address,
                        network = %request.network,
                        error = %e,
                        "Account processing failed"
                    ),
                    None => error!(network = %request.network, error = %e, "Account processing failed"),
                }
                TransactionOutcome::Failed(e)
            }
        }
    }

    /// Like [`process`](Self::process) but returns failures as `Err` and logs nothing on error.
    pub async fn try_process(
        &self,
        request: &AccountRequest,
    ) -> Result<TransactionOutcome, OrchestratorError> {
        let (profile, rpc) = self.resolve(&request.network)?;
        let settings = &self.config.bridge;

        if !rpc.is_connected(settings.connect_timeout).await {
            return Err(OrchestratorError::Unreachable {
                network: profile.slug.clone(),
            });
        }

        let signer: PrivateKeySigner = request
            .private_key
            .expose()
            .trim()
            .parse()
            .map_err(|e| OrchestratorError::SigningFailure(format!("invalid private key: {}", e)))?;
        let sender = signer.address();
        info!(address = %sender, network = %profile.slug, "Processing account");

        let amount = parse_amount(&request.amount)?;
        let slippage = Slippage::from_fraction(request.slippage)?;

        let quote = self.fetch_quote(rpc, profile, amount).await?;
        let min_out = slippage.min_amount_out(quote.estimated_out);
        debug!(
            address = %sender,
            messaging_fee = %quote.messaging_fee,
            estimated_out = %quote.estimated_out,
            min_out = %min_out,
            "Quote received"
        );

        let gas = self.gas_plan(rpc).await?;
        info!(
            base_fee = gas.base_fee,
            priority_fee = gas.priority_fee,
            max_fee = gas.max_fee,
            "Gas plan"
        );

        let value = amount
            .checked_add(quote.messaging_fee)
            .ok_or_else(|| OrchestratorError::InvalidAmount {
                amount: request.amount.clone(),
                reason: "amount plus messaging fee overflows uint256".to_string(),
            })?;
        let input = contracts::encode_swap_and_bridge(
            amount,
            min_out,
            settings.destination_chain_id,
            sender,
        );
        let call = TransactionRequest::default()
            .with_from(sender)
            .with_to(profile.bridge_address)
            .with_input(input)
            .with_value(value);

        let gas_limit = self.gas_limit(rpc, &call).await?;

        let nonce = rpc
            .transaction_count(sender)
            .await
            .map_err(|e| OrchestratorError::NodeQuery(format!("{:#}", e)))?;

        let tx = call
            .with_chain_id(profile.chain_id)
            .with_nonce(nonce)
            .with_gas_limit(gas_limit)
            .with_max_fee_per_gas(gas.max_fee)
            .with_max_priority_fee_per_gas(gas.priority_fee);

        let wallet = EthereumWallet::from(signer);
        let envelope = tx
            .build(&wallet)
            .await
            .map_err(|e| OrchestratorError::SigningFailure(e.to_string()))?;
        let raw = envelope.encoded_2718();

        let tx_hash = rpc
            .send_raw_transaction(&raw)
            .await
            .map_err(|e| OrchestratorError::BroadcastFailure(format!("{:#}", e)))?;
        info!(
            address = %sender,
            tx_hash = %tx_hash,
            nonce,
            value = %value,
            "Transaction sent"
        );

        if !settings.await_receipt {
            return Ok(TransactionOutcome::Submitted(tx_hash));
        }

        let succeeded = self.wait_for_receipt(rpc, tx_hash, settings).await?;
        if succeeded {
            info!(address = %sender, tx_hash = %tx_hash, "Transaction confirmed");
            Ok(TransactionOutcome::Confirmed(tx_hash))
        } else {
            error!(address = %sender, tx_hash = %tx_hash, "Transaction reverted");
            Ok(TransactionOutcome::Reverted(tx_hash))
        }
    }

    fn resolve(&self, network: &str) -> Result<(&NetworkProfile, &R), OrchestratorError> {
        let unsupported = || OrchestratorError::UnsupportedNetwork(network.to_string());
        let profile = self.config.network(network).ok_or_else(unsupported)?;
        let rpc = self.clients.get(network).ok_or_else(unsupported)?;
        Ok((profile, rpc))
    }

    async fn fetch_quote(
        &self,
        rpc: &R,
        profile: &NetworkProfile,
        amount: U256,
    ) -> Result<QuoteResult, OrchestratorError> {
        let settings = &self.config.bridge;
        let fee_call = contracts::encode_estimate_send_fee(
            settings.destination_chain_id,
            settings.fee_probe_recipient,
            amount,
        );
        let quote_call = contracts::encode_quote_exact_input_single(
            profile.weth_address,
            settings.destination_token,
            settings.pool_fee,
            amount,
        )
        .map_err(|e| OrchestratorError::QuoteUnavailable(format!("{:#}", e)))?;

        let fee = async {
            let raw = rpc.call(settings.fee_estimator_address, fee_call).await?;
            contracts::decode_native_fee(&raw)
        };
        let out = async {
            let raw = rpc.call(settings.quoter_address, quote_call).await?;
            contracts::decode_amount_out(&raw)
        };

        let (messaging_fee, estimated_out) = tokio::try_join!(fee, out)
            .map_err(|e| OrchestratorError::QuoteUnavailable(format!("{:#}", e)))?;

        Ok(QuoteResult {
            messaging_fee,
            estimated_out,
        })
    }

    async fn gas_plan(&self, rpc: &R) -> Result<GasPlan, OrchestratorError> {
        let base_fee = rpc
            .latest_base_fee()
            .await
            .map_err(|e| OrchestratorError::NodeQuery(format!("{:#}", e)))?
            .ok_or_else(|| {
                OrchestratorError::NodeQuery("latest block has no baseFeePerGas".into())
            })?;

        GasPlan::from_base_fee(base_fee, self.config.bridge.priority_fee_wei)
            .ok_or_else(|| OrchestratorError::NodeQuery("max fee overflows u128".into()))
    }

    async fn gas_limit(
        &self,
        rpc: &R,
        call: &TransactionRequest,
    ) -> Result<u64, OrchestratorError> {
        match self.config.bridge.gas_limit {
            GasLimitStrategy::Fixed(limit) => Ok(limit),
            GasLimitStrategy::Estimate { buffer_percent } => {
                let estimate = rpc
                    .estimate_gas(call)
                    .await
                    .map_err(|e| OrchestratorError::NodeQuery(format!("{:#}", e)))?;
                let limit = buffered_gas_limit(estimate, buffer_percent);
                debug!(estimate, limit, "Gas limit from estimate");
                Ok(limit)
            }
        }
    }

    /// Poll until mined or the deadline passes. Query errors are logged and polled through.
    async fn wait_for_receipt(
        &self,
        rpc: &R,
        tx_hash: TxHash,
        settings: &BridgeSettings,
    ) -> Result<bool, OrchestratorError> {
        let poll_interval = settings.receipt_poll_interval;
        let timeout = settings.confirmation_timeout;

        let poll = async {
            loop {
                match rpc.receipt_status(tx_hash).await {
                    Ok(Some(status)) => return status,
                    Ok(None) => {}
                    Err(e) => warn!(tx_hash = %tx_hash, error = %e, "Receipt query failed"),
                }
                tokio::time::sleep(poll_interval).await;
            }
        };

        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| OrchestratorError::ConfirmationTimeout { tx_hash, timeout })
    }
}

/// Sender address for a key, without touching the network
fn sender_address(private_key: &str) -> Option<Address> {
    private_key
        .trim()
        .parse::<PrivateKeySigner>()
        .ok()
        .map(|s| s.address())
}
