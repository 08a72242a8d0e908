//! Testnet Bridger: batch swap-and-bridge into Sepolia ETH
//!
//! For each private key the [`Orchestrator`] quotes the Uniswap V3 WETH
//! pool and the LayerZero messaging fee, derives a slippage-protected
//! minimum output, prices the transaction with EIP-1559 fees, signs it
//! locally and broadcasts a `swapAndBridge` call, then waits for the
//! receipt.
//!
//! - **config** - Network profiles and bridge settings, env overrides
//! - **contracts** - sol! bindings for the bridge, quoter and OFT fee estimator
//! - **orchestrator** - Per-account transaction lifecycle
//! - **rpc** - `EvmRpc` node seam and the alloy HTTP implementation
//! - **pricing** - Exact slippage, amount and gas arithmetic
//! - **batch** - Sequential runner with randomized amounts and delays
//! - **keys** - Private key file loading

pub mod batch;
pub mod cli;
pub mod config;
pub mod contracts;
pub mod error;
pub mod keys;
pub mod orchestrator;
pub mod pricing;
pub mod redact;
pub mod rpc;
pub mod types;

pub use batch::{run_batch, BatchParams, BatchSummary};
pub use config::{BridgeSettings, Config, GasLimitStrategy};
pub use error::OrchestratorError;
pub use orchestrator::Orchestrator;
pub use pricing::Slippage;
pub use redact::Redacted;
pub use rpc::{EvmRpc, HttpRpc};
pub use types::{AccountRequest, GasPlan, NetworkProfile, QuoteResult, TransactionOutcome};
