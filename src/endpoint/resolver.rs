//! Maps a hosted node provider and chain id to a JSON-RPC URL.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Supported networks, keyed by chain id.
pub const NETWORKS: [(u64, &str); 10] = [
    (1, "mainnet"),
    (3, "ropsten"),
    (4, "rinkeby"),
    (5, "goerli"),
    (42, "kovan"),
    (56, "bsc"),
    (97, "bsc-testnet"),
    (100, "xdai"),
    (137, "matic"),
    (80001, "mumbai"),
];

/// Errors raised while resolving an endpoint. Both are raised before any network access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// Chain id is not in the network table.
    #[error("Network ID not supported: {0}")]
    UnsupportedNetwork(u64),

    /// Provider name is not one of the recognized hosts.
    #[error("Provider not supported: {0}")]
    UnsupportedProvider(String),
}

/// Hosted JSON-RPC providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeProvider {
    Infura,
    Alchemy,
    QuickNode,
}

impl NodeProvider {
    /// Name used in configuration and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Infura => "infura",
            Self::Alchemy => "alchemy",
            Self::QuickNode => "quicknode",
        }
    }

    /// Build the URL for a network on this provider.
    pub fn url(&self, network: &str, api_key: &str) -> String {
        match self {
            Self::Infura => format!("https://{network}.infura.io/v3/{api_key}"),
            Self::Alchemy => format!("https://{network}.alchemyapi.io/v2/{api_key}"),
            Self::QuickNode => format!("https://{network}.quiknode.pro/{api_key}/"),
        }
    }
}

impl FromStr for NodeProvider {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "infura" => Ok(Self::Infura),
            "alchemy" => Ok(Self::Alchemy),
            "quicknode" => Ok(Self::QuickNode),
            other => Err(EndpointError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for NodeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look up the provider-facing network name for a chain id.
pub fn network_name(chain_id: u64) -> Option<&'static str> {
    NETWORKS
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, name)| *name)
}

/// Resolve a provider name, API key and chain id into a JSON-RPC URL.
///
/// # Errors
/// [`EndpointError::UnsupportedNetwork`] if the chain id is unknown,
/// [`EndpointError::UnsupportedProvider`] if the provider name is unknown.
pub fn resolve(provider: &str, api_key: &str, chain_id: u64) -> Result<String, EndpointError> {
    let network = network_name(chain_id).ok_or(EndpointError::UnsupportedNetwork(chain_id))?;
    let provider: NodeProvider = provider.parse()?;
    Ok(provider.url(network, api_key))
}
