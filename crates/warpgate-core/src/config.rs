//! Configuration types for Warpgate

use serde::{Deserialize, Serialize};

use crate::{Address, BasisPoints, ChainId, Error, BPS_DENOMINATOR};

/// Ledger connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Fullnode URL (e.g., "https://mainnet.movementnetwork.xyz/v1")
    pub url: String,

    /// Per-request timeout for view calls
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            url: "https://mainnet.movementnetwork.xyz/v1".to_string(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Swap protocol configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapConfig {
    /// Account that publishes the `swap` module
    #[serde(default)]
    pub swap_address: Option<Address>,

    /// Slippage applied when a request does not specify one
    #[serde(default = "default_slippage_bps")]
    pub default_slippage_bps: BasisPoints,

    /// Hop limit for best-route search
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,

    /// Number of trades kept by best-route search
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_slippage_bps() -> BasisPoints {
    50
}

fn default_max_hops() -> usize {
    3
}

fn default_max_results() -> usize {
    3
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            swap_address: None,
            default_slippage_bps: default_slippage_bps(),
            max_hops: default_max_hops(),
            max_results: default_max_results(),
        }
    }
}

/// SDK configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Chain the tokens live on
    #[serde(default = "default_chain_id")]
    pub chain_id: ChainId,

    /// Ledger connection settings
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Swap protocol settings
    #[serde(default)]
    pub swap: SwapConfig,
}

fn default_chain_id() -> ChainId {
    ChainId::MOVE_MAINNET
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            ledger: LedgerConfig::default(),
            swap: SwapConfig::default(),
        }
    }
}

impl SdkConfig {
    /// Parse a JSON configuration document and validate it
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config: SdkConfig =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), Error> {
        if self.swap.default_slippage_bps >= BPS_DENOMINATOR {
            return Err(Error::Config(format!(
                "default_slippage_bps must be below {}, got {}",
                BPS_DENOMINATOR, self.swap.default_slippage_bps
            )));
        }
        if self.swap.max_hops == 0 {
            return Err(Error::Config("max_hops must be at least 1".to_string()));
        }
        if self.swap.max_results == 0 {
            return Err(Error::Config("max_results must be at least 1".to_string()));
        }
        if self.ledger.request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
