//! Web3 Helper Gateway Library

pub mod config;
pub mod endpoint;
pub mod blockchain;
pub mod ipfs;
pub mod walletconnect;
pub mod observability;

pub use blockchain::{BlockchainClient, BlockchainError, Wallet};
pub use config::GatewayConfig;
pub use endpoint::resolve;
pub use ipfs::IpfsClient;
