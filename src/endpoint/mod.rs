//! RPC endpoint resolution.
//!
//! # Data Flow
//! ```text
//! (provider name, API key, chain id)
//!     → resolver.rs (network table lookup, provider URL template)
//!     → JSON-RPC URL handed to the blockchain gateway
//! ```
//!
//! # Design Decisions
//! - Pure string substitution: no I/O, nothing cached
//! - Chain id is checked before the provider name

pub mod resolver;

pub use resolver::{network_name, resolve, EndpointError, NodeProvider, NETWORKS};
