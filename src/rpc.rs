//! Node access for the orchestrator
//!
//! [`EvmRpc`] is the seam between transaction orchestration and the chain:
//! the orchestrator only ever talks to a node through it, so tests can swap
//! in an in-memory double. [`HttpRpc`] is the alloy-backed implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alloy::{
    eips::BlockNumberOrTag,
    network::TransactionBuilder,
    primitives::{Address, Bytes, TxHash},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::{BlockTransactionsKind, TransactionRequest},
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use eyre::{eyre, Result, WrapErr};
use tracing::{debug, info};

use crate::config::Config;

/// Read and broadcast operations the orchestrator needs from a node
#[async_trait]
pub trait EvmRpc: Send + Sync {
    /// Cheap liveness probe, bounded by `timeout`
    async fn is_connected(&self, timeout: Duration) -> bool;

    /// `eth_call` against the latest block
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;

    /// `baseFeePerGas` of the latest block (`None` on pre-London chains)
    async fn latest_base_fee(&self) -> Result<Option<u128>>;

    async fn transaction_count(&self, address: Address) -> Result<u64>;

    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64>;

    /// Broadcast a signed EIP-2718 envelope
    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash>;

    /// Receipt status if mined: `Some(true)` success, `Some(false)` reverted
    async fn receipt_status(&self, tx_hash: TxHash) -> Result<Option<bool>>;
}

#[async_trait]
impl<T: EvmRpc + ?Sized> EvmRpc for Arc<T> {
    async fn is_connected(&self, timeout: Duration) -> bool {
        (**self).is_connected(timeout).await
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        (**self).call(to, data).await
    }

    async fn latest_base_fee(&self) -> Result<Option<u128>> {
        (**self).latest_base_fee().await
    }

    async fn transaction_count(&self, address: Address) -> Result<u64> {
        (**self).transaction_count(address).await
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64> {
        (**self).estimate_gas(tx).await
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash> {
        (**self).send_raw_transaction(raw).await
    }

    async fn receipt_status(&self, tx_hash: TxHash) -> Result<Option<bool>> {
        (**self).receipt_status(tx_hash).await
    }
}

/// JSON-RPC node client over HTTP
pub struct HttpRpc {
    provider: RootProvider<Http<Client>>,
}

impl HttpRpc {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let provider = ProviderBuilder::new().on_http(
            rpc_url
                .parse()
                .wrap_err_with(|| format!("Invalid RPC URL: {}", rpc_url))?,
        );
        Ok(Self { provider })
    }

    /// One client per configured network, keyed by slug
    pub fn for_networks(config: &Config) -> Result<HashMap<String, HttpRpc>> {
        config
            .networks
            .values()
            .map(|profile| {
                let client = HttpRpc::new(&profile.rpc_url)
                    .wrap_err_with(|| format!("Network {}", profile.slug))?;
                info!(network = %profile.slug, chain_id = profile.chain_id, "Created RPC client");
                Ok((profile.slug.clone(), client))
            })
            .collect()
    }
}

#[async_trait]
impl EvmRpc for HttpRpc {
    async fn is_connected(&self, timeout: Duration) -> bool {
        match tokio::time::timeout(timeout, self.provider.get_block_number()).await {
            Ok(Ok(block)) => {
                debug!(block, "RPC reachable");
                true
            }
            Ok(Err(e)) => {
                debug!(error = %e, "RPC probe failed");
                false
            }
            Err(_) => {
                debug!(timeout_ms = timeout.as_millis() as u64, "RPC probe timed out");
                false
            }
        }
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default().with_to(to).with_input(data);
        let out = self
            .provider
            .call(&tx)
            .await
            .wrap_err_with(|| format!("eth_call to {} failed", to))?;
        Ok(out)
    }

    async fn latest_base_fee(&self) -> Result<Option<u128>> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest, BlockTransactionsKind::Hashes)
            .await
            .wrap_err("Failed to get latest block")?
            .ok_or_else(|| eyre!("Latest block not returned"))?;
        Ok(block.header.base_fee_per_gas.map(u128::from))
    }

    async fn transaction_count(&self, address: Address) -> Result<u64> {
        let nonce = self
            .provider
            .get_transaction_count(address)
            .await
            .wrap_err("Failed to get transaction count")?;
        Ok(nonce)
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64> {
        let gas = self
            .provider
            .estimate_gas(tx)
            .await
            .wrap_err("Failed to estimate gas")?;
        Ok(gas)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .wrap_err("Failed to send raw transaction")?;
        Ok(*pending.tx_hash())
    }

    async fn receipt_status(&self, tx_hash: TxHash) -> Result<Option<bool>> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .wrap_err("Failed to get transaction receipt")?;
        Ok(receipt.map(|r| r.status()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_rpc_rejects_bad_url() {
        assert!(HttpRpc::new("not a url").is_err());
    }

    #[test]
    fn test_clients_for_default_networks() {
        let config = Config::default();
        let clients = HttpRpc::for_networks(&config).unwrap();
        assert_eq!(clients.len(), 2);
        assert!(clients.contains_key(crate::types::OPTIMISM));
        assert!(clients.contains_key(crate::types::ARBITRUM_ONE));
    }

    #[test]
    fn test_closed_port_is_not_connected() {
        let rpc = HttpRpc::new("http://127.0.0.1:1").unwrap();
        let connected = tokio_test::block_on(rpc.is_connected(Duration::from_secs(2)));
        assert!(!connected);
    }
}
