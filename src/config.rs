//! Bridger configuration
//!
//! Built-in defaults reproduce the mainnet deployment of the Sepolia ETH
//! testnet bridge on Arbitrum One and Optimism. Every value can be
//! overridden from the environment (or a `.env` file).

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use alloy::primitives::{address, Address, FixedBytes};
use eyre::{eyre, Result, WrapErr};

use crate::types::{NetworkProfile, ARBITRUM_ONE, OPTIMISM};

/// Uniswap V3 quoter (same address on both source chains)
pub const DEFAULT_QUOTER: Address = address!("b27308f9f90d607463bb33ea1bebb41c27ce5ab6");
/// Sepolia ETH OFT: swap output token and LayerZero fee estimator
pub const DEFAULT_SEPOLIA_ETH_TOKEN: Address = address!("e71bdfe1df69284f00ee185cf0d95d0c7680c0d4");
/// LayerZero endpoint id of Sepolia
pub const DEFAULT_DESTINATION_CHAIN_ID: u16 = 161;
/// 0.3% pool
pub const DEFAULT_POOL_FEE: u32 = 3000;
/// Largest fee tier the quoter's `uint24` accepts
pub const MAX_POOL_FEE: u32 = 0xFF_FFFF;
pub const DEFAULT_GAS_LIMIT: u64 = 700_000;
/// 1 gwei
pub const DEFAULT_PRIORITY_FEE_WEI: u128 = 1_000_000_000;

/// How the gas limit of the bridge transaction is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasLimitStrategy {
    /// Fixed ceiling, no estimate round trip
    Fixed(u64),
    /// `eth_estimateGas` plus a percentage buffer
    Estimate { buffer_percent: u32 },
}

impl Default for GasLimitStrategy {
    fn default() -> Self {
        GasLimitStrategy::Fixed(DEFAULT_GAS_LIMIT)
    }
}

/// Contract addresses and transaction policy shared by all networks
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeSettings {
    pub quoter_address: Address,
    pub fee_estimator_address: Address,
    /// Token the quoter swaps WETH into
    pub destination_token: Address,
    pub destination_chain_id: u16,
    pub pool_fee: u32,
    /// 32-byte `toAddress` passed to `estimateSendFee`
    pub fee_probe_recipient: FixedBytes<32>,
    pub gas_limit: GasLimitStrategy,
    pub priority_fee_wei: u128,
    pub connect_timeout: Duration,
    pub confirmation_timeout: Duration,
    pub receipt_poll_interval: Duration,
    /// When false, return right after broadcast
    pub await_receipt: bool,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            quoter_address: DEFAULT_QUOTER,
            fee_estimator_address: DEFAULT_SEPOLIA_ETH_TOKEN,
            destination_token: DEFAULT_SEPOLIA_ETH_TOKEN,
            destination_chain_id: DEFAULT_DESTINATION_CHAIN_ID,
            pool_fee: DEFAULT_POOL_FEE,
            fee_probe_recipient: FixedBytes::with_last_byte(1),
            gas_limit: GasLimitStrategy::default(),
            priority_fee_wei: DEFAULT_PRIORITY_FEE_WEI,
            connect_timeout: Duration::from_secs(10),
            confirmation_timeout: Duration::from_secs(300),
            receipt_poll_interval: Duration::from_secs(2),
            await_receipt: true,
        }
    }
}

/// Full configuration: network profiles keyed by slug plus bridge settings
#[derive(Clone)]
pub struct Config {
    pub networks: BTreeMap<String, NetworkProfile>,
    pub bridge: BridgeSettings,
}

/// Custom Debug that omits RPC URLs (hosted endpoints often embed API keys).
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("networks", &self.networks.keys().collect::<Vec<_>>())
            .field("bridge", &self.bridge)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let networks = default_networks()
            .into_iter()
            .map(|p| (p.slug.clone(), p))
            .collect();
        Self {
            networks,
            bridge: BridgeSettings::default(),
        }
    }
}

/// Arbitrum One and Optimism deployments
pub fn default_networks() -> Vec<NetworkProfile> {
    vec![
        NetworkProfile {
            slug: ARBITRUM_ONE.to_string(),
            rpc_url: "https://arb1.arbitrum.io/rpc".to_string(),
            chain_id: 42161,
            bridge_address: address!("fca99f4b5186d4bfbdbd2c542dca2eca4906ba45"),
            weth_address: address!("82af49447d8a07e3bd95bd0d56f35241523fbab1"),
        },
        NetworkProfile {
            slug: OPTIMISM.to_string(),
            rpc_url: "https://rpc.ankr.com/optimism".to_string(),
            chain_id: 10,
            bridge_address: address!("8352c746839699b1fc631fddc0c3a00d4ac71a17"),
            weth_address: address!("4200000000000000000000000000000000000006"),
        },
    ]
}

impl Config {
    /// Load configuration, reading `.env` first if present
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded .env from {:?}", path);
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from a specific .env file path
    pub fn load_from_file(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            dotenvy::from_filename(path)
                .wrap_err_with(|| format!("Failed to load .env file from {}", path))?;
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from defaults plus whatever `lookup` returns for each known key
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup("NETWORKS_FILE") {
            for profile in load_networks_file(&path)? {
                config.networks.insert(profile.slug.clone(), profile);
            }
        }

        for profile in config.networks.values_mut() {
            apply_network_overrides(profile, &lookup)?;
        }

        let bridge = &mut config.bridge;
        if let Some(v) = parse_var::<Address>(&lookup, "QUOTER_ADDRESS")? {
            bridge.quoter_address = v;
        }
        if let Some(v) = parse_var::<Address>(&lookup, "FEE_ESTIMATOR_ADDRESS")? {
            bridge.fee_estimator_address = v;
        }
        if let Some(v) = parse_var::<Address>(&lookup, "DESTINATION_TOKEN")? {
            bridge.destination_token = v;
        }
        if let Some(v) = parse_var::<u16>(&lookup, "DESTINATION_CHAIN_ID")? {
            bridge.destination_chain_id = v;
        }
        if let Some(v) = parse_var::<u32>(&lookup, "POOL_FEE")? {
            if v > MAX_POOL_FEE {
                return Err(eyre!("Invalid POOL_FEE: {} exceeds uint24 max {}", v, MAX_POOL_FEE));
            }
            bridge.pool_fee = v;
        }
        if let Some(v) = parse_var::<u128>(&lookup, "PRIORITY_FEE_WEI")? {
            bridge.priority_fee_wei = v;
        }
        if let Some(v) = parse_var::<u64>(&lookup, "CONNECT_TIMEOUT_SECS")? {
            bridge.connect_timeout = Duration::from_secs(v);
        }
        if let Some(v) = parse_var::<u64>(&lookup, "CONFIRMATION_TIMEOUT_SECS")? {
            bridge.confirmation_timeout = Duration::from_secs(v);
        }
        if let Some(v) = parse_var::<u64>(&lookup, "RECEIPT_POLL_INTERVAL_MS")? {
            bridge.receipt_poll_interval = Duration::from_millis(v);
        }
        if let Some(v) = parse_var::<bool>(&lookup, "AWAIT_RECEIPT")? {
            bridge.await_receipt = v;
        }
        bridge.gas_limit = parse_gas_limit_strategy(&lookup)?;

        Ok(config)
    }

    pub fn network(&self, slug: &str) -> Option<&NetworkProfile> {
        self.networks.get(slug)
    }
}

fn load_networks_file(path: &str) -> Result<Vec<NetworkProfile>> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read NETWORKS_FILE {}", path))?;
    serde_json::from_str(&raw).wrap_err_with(|| format!("Invalid network profiles in {}", path))
}

fn apply_network_overrides<F>(profile: &mut NetworkProfile, lookup: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let prefix = profile.slug.to_uppercase();

    if let Some(url) = lookup(&format!("{}_RPC_URL", prefix)) {
        profile.rpc_url = url.trim().to_string();
    }
    if let Some(v) = parse_var::<u64>(lookup, &format!("{}_CHAIN_ID", prefix))? {
        profile.chain_id = v;
    }
    if let Some(v) = parse_var::<Address>(lookup, &format!("{}_BRIDGE_ADDRESS", prefix))? {
        profile.bridge_address = v;
    }
    if let Some(v) = parse_var::<Address>(lookup, &format!("{}_WETH_ADDRESS", prefix))? {
        profile.weth_address = v;
    }
    Ok(())
}

fn parse_gas_limit_strategy<F>(lookup: &F) -> Result<GasLimitStrategy>
where
    F: Fn(&str) -> Option<String>,
{
    let strategy = lookup("GAS_LIMIT_STRATEGY").unwrap_or_else(|| "fixed".to_string());
    match strategy.trim().to_lowercase().as_str() {
        "fixed" => {
            let limit = parse_var::<u64>(lookup, "GAS_LIMIT")?.unwrap_or(DEFAULT_GAS_LIMIT);
            Ok(GasLimitStrategy::Fixed(limit))
        }
        "estimate" => {
            let buffer_percent =
                parse_var::<u32>(lookup, "GAS_ESTIMATE_BUFFER_PERCENT")?.unwrap_or(20);
            Ok(GasLimitStrategy::Estimate { buffer_percent })
        }
        other => Err(eyre!(
            "Invalid GAS_LIMIT_STRATEGY {:?}: expected \"fixed\" or \"estimate\"",
            other
        )),
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| eyre!("Invalid {}: {}", key, e)),
    }
}
