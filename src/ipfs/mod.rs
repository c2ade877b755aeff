//! IPFS storage helpers.
//!
//! # Data Flow
//! ```text
//! IpfsConfig (API url, optional project credentials)
//!     → IpfsClient::new (built once at startup, passed to callers)
//!     → /api/v0/add  (bytes or JSON → CID)
//!     → /api/v0/cat  (CID → streamed chunks → one buffer)
//! ```
//!
//! # Design Decisions
//! - The client is immutable after construction and cheap to clone
//! - `cat` keeps the whole object in memory; no size bound is applied

pub mod client;

pub use client::{IpfsClient, IpfsError, IpfsResult};
