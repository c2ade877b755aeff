//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::blockchain::enumerate::EnumerationOptions;
use crate::blockchain::transaction::{DEFAULT_CONFIRMATIONS, DEFAULT_POLL_INTERVAL};
use crate::endpoint::{resolve, EndpointError};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// JSON-RPC endpoint selection.
    pub rpc: RpcConfig,

    /// IPFS API node.
    pub ipfs: IpfsConfig,

    /// Confirmation wait settings.
    pub confirmations: ConfirmationConfig,

    /// Bounds and failure policy for history and NFT enumeration.
    pub enumeration: EnumerationOptions,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// JSON-RPC endpoint configuration.
///
/// Either a literal `url`, or a `provider` + `api_key` + `chain_id` triple
/// resolved through the endpoint table. A literal URL wins when both are set.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RpcConfig {
    /// Literal endpoint URL.
    pub url: Option<String>,

    /// Node provider name (infura, alchemy, quicknode).
    pub provider: Option<String>,

    /// Provider API key.
    pub api_key: Option<String>,

    /// Numeric chain id used for endpoint resolution.
    pub chain_id: Option<u64>,
}

impl RpcConfig {
    /// The endpoint URL, if one is configured.
    ///
    /// Returns `Ok(None)` when neither a URL nor a complete provider triple is set.
    pub fn endpoint(&self) -> Result<Option<String>, EndpointError> {
        if let Some(url) = &self.url {
            return Ok(Some(url.clone()));
        }
        match (&self.provider, &self.api_key, self.chain_id) {
            (Some(provider), Some(api_key), Some(chain_id)) => {
                resolve(provider, api_key, chain_id).map(Some)
            }
            _ => Ok(None),
        }
    }
}

/// IPFS API node configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IpfsConfig {
    /// API base URL (e.g., "https://ipfs.infura.io:5001").
    pub url: String,

    /// Project id sent as the basic-auth user.
    pub project_id: Option<String>,

    /// Project secret sent as the basic-auth password.
    pub project_secret: Option<String>,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            url: "https://ipfs.infura.io:5001".to_string(),
            project_id: None,
            project_secret: None,
        }
    }
}

impl IpfsConfig {
    /// Parsed base URL, always ending in `/` so API paths join underneath it.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.url)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

/// Confirmation wait configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Confirmations to wait for when the caller does not specify.
    pub required: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            required: DEFAULT_CONFIRMATIONS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
        }
    }
}

impl ConfirmationConfig {
    /// Polling interval as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
