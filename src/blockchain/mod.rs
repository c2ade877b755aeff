//! Blockchain gateway subsystem.
//!
//! # Data Flow
//! ```text
//! Caller (RPC URL, private key, addresses)
//!     → wallet.rs (key generation/import, message signing)
//!     → client.rs (fresh RPC connection per operation, reads)
//!     → transaction.rs (build, sign, broadcast, confirm)
//!     → contract.rs / tokens.rs (ABI-dispatched and ERC-20/721 calls)
//!     → history.rs / nft.rs via enumerate.rs (sequential index walks)
//!     → events.rs (log polling, per-event callback)
//! ```
//!
//! # Security Constraints
//! - Private keys are supplied per call and never stored
//! - Never log private keys or sensitive data
//! - Amounts are decimal strings converted exactly once (units.rs)

pub mod client;
pub mod contract;
pub mod enumerate;
pub mod events;
pub mod history;
pub mod nft;
pub mod tokens;
pub mod transaction;
pub mod types;
pub mod units;
pub mod wallet;

pub use client::BlockchainClient;
pub use contract::ContractDispatcher;
pub use enumerate::{EnumerationOptions, FailurePolicy};
pub use nft::NftMetadata;
pub use types::{BlockchainError, BlockchainResult, GasSettings, WalletMaterial};
pub use wallet::Wallet;
