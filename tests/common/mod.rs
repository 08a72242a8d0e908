//! In-memory node double shared by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::consensus::{TxEip1559, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{keccak256, Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use eyre::{eyre, Result};

use testnet_bridger::contracts::{IOFTFee, IQuoter};
use testnet_bridger::{Config, EvmRpc, Orchestrator};

/// Anvil's first dev account
pub const KEY_A: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const ADDRESS_A: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
/// Anvil's second dev account
pub const KEY_B: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

pub const ONE_GWEI: u128 = 1_000_000_000;

/// How the node answers receipt queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptMode {
    Success,
    Reverted,
    /// Never mined
    Pending,
    /// Error on the first `n` queries, then succeed
    FlakyThenSuccess(usize),
}

/// Scriptable node. Every trait call is appended to `calls` by name.
pub struct MockRpc {
    pub connected: bool,
    pub native_fee: U256,
    pub amount_out: U256,
    pub fee_estimator_fails: bool,
    pub quoter_fails: bool,
    pub base_fee: Option<u128>,
    pub gas_estimate: u64,
    pub estimate_fails: bool,
    pub nonce_fails: bool,
    pub send_fails: bool,
    pub receipt_mode: ReceiptMode,
    pub state: Mutex<MockState>,
}

#[derive(Default)]
pub struct MockState {
    calls: Vec<String>,
    call_data: HashMap<String, Bytes>,
    next_nonce: u64,
    sent: Vec<Vec<u8>>,
    receipt_queries: usize,
}

impl Default for MockRpc {
    fn default() -> Self {
        Self {
            connected: true,
            native_fee: U256::from(50_000_000_000_000u64),
            amount_out: U256::from(2000),
            fee_estimator_fails: false,
            quoter_fails: false,
            base_fee: Some(ONE_GWEI),
            gas_estimate: 250_000,
            estimate_fails: false,
            nonce_fails: false,
            send_fails: false,
            receipt_mode: ReceiptMode::Success,
            state: Mutex::new(MockState::default()),
        }
    }
}

impl MockRpc {
    fn record(&self, name: &str) {
        self.state.lock().unwrap().calls.push(name.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn called(&self, name: &str) -> bool {
        self.calls().iter().any(|c| c == name)
    }

    /// Last calldata seen for `estimateSendFee` / `quoteExactInputSingle`
    pub fn call_data(&self, name: &str) -> Option<Bytes> {
        self.state.lock().unwrap().call_data.get(name).cloned()
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Decoded EIP-1559 body of the `idx`-th broadcast
    pub fn sent_tx(&self, idx: usize) -> TxEip1559 {
        let raw = self.sent()[idx].clone();
        let envelope = TxEnvelope::decode_2718(&mut raw.as_slice()).expect("valid envelope");
        envelope
            .as_eip1559()
            .expect("EIP-1559 transaction")
            .tx()
            .clone()
    }
}

#[async_trait]
impl EvmRpc for MockRpc {
    async fn is_connected(&self, _timeout: Duration) -> bool {
        self.record("is_connected");
        self.connected
    }

    async fn call(&self, _to: Address, data: Bytes) -> Result<Bytes> {
        let selector: [u8; 4] = data
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| eyre!("calldata too short"))?;

        if selector == IOFTFee::estimateSendFeeCall::SELECTOR {
            self.record("estimateSendFee");
            self.state
                .lock()
                .unwrap()
                .call_data
                .insert("estimateSendFee".into(), data.clone());
            if self.fee_estimator_fails {
                return Err(eyre!("execution reverted"));
            }
            let ret = IOFTFee::estimateSendFeeCall::abi_encode_returns(&(self.native_fee, U256::ZERO));
            Ok(ret.into())
        } else if selector == IQuoter::quoteExactInputSingleCall::SELECTOR {
            self.record("quoteExactInputSingle");
            self.state
                .lock()
                .unwrap()
                .call_data
                .insert("quoteExactInputSingle".into(), data.clone());
            if self.quoter_fails {
                return Err(eyre!("Unexpected error"));
            }
            let ret = IQuoter::quoteExactInputSingleCall::abi_encode_returns(&(self.amount_out,));
            Ok(ret.into())
        } else {
            Err(eyre!("unknown selector"))
        }
    }

    async fn latest_base_fee(&self) -> Result<Option<u128>> {
        self.record("latest_base_fee");
        Ok(self.base_fee)
    }

    async fn transaction_count(&self, _address: Address) -> Result<u64> {
        self.record("transaction_count");
        if self.nonce_fails {
            return Err(eyre!("header not found"));
        }
        Ok(self.state.lock().unwrap().next_nonce)
    }

    async fn estimate_gas(&self, _tx: &TransactionRequest) -> Result<u64> {
        self.record("estimate_gas");
        if self.estimate_fails {
            return Err(eyre!("execution reverted"));
        }
        Ok(self.gas_estimate)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash> {
        self.record("send_raw_transaction");
        if self.send_fails {
            return Err(eyre!("replacement transaction underpriced"));
        }
        let mut state = self.state.lock().unwrap();
        state.sent.push(raw.to_vec());
        state.next_nonce += 1;
        Ok(keccak256(raw))
    }

    async fn receipt_status(&self, _tx_hash: TxHash) -> Result<Option<bool>> {
        self.record("receipt_status");
        let queries = {
            let mut state = self.state.lock().unwrap();
            state.receipt_queries += 1;
            state.receipt_queries
        };
        match self.receipt_mode {
            ReceiptMode::Success => Ok(Some(true)),
            ReceiptMode::Reverted => Ok(Some(false)),
            ReceiptMode::Pending => Ok(None),
            ReceiptMode::FlakyThenSuccess(n) if queries <= n => Err(eyre!("connection reset")),
            ReceiptMode::FlakyThenSuccess(_) => Ok(Some(true)),
        }
    }
}

/// Default config with fast receipt polling
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.bridge.receipt_poll_interval = Duration::from_millis(1);
    config.bridge.confirmation_timeout = Duration::from_secs(5);
    config
}

/// Orchestrator with `mock` serving Optimism only
pub fn orchestrator_with(config: Config, mock: Arc<MockRpc>) -> Orchestrator<Arc<MockRpc>> {
    let mut clients = HashMap::new();
    clients.insert(testnet_bridger::types::OPTIMISM.to_string(), mock);
    Orchestrator::new(config, clients)
}
