//! WalletConnect helpers.
//!
//! # Data Flow
//! ```text
//! External WalletConnect client (implements WalletConnectBridge)
//!     → session.rs (enable on connect)
//!     → eth_accounts / eth_sendTransaction / personal_sign requests
//!     → disconnect
//! ```
//!
//! # Design Decisions
//! - The session transport is injected; this module only shapes requests
//! - Keys stay in the remote wallet, so nothing here signs locally

pub mod session;

pub use session::{WalletConnectBridge, WalletConnectError, WalletConnectResult, WalletConnectSession};
