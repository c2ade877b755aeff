//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global `tracing` subscriber for binaries
//! - Respect `RUST_LOG` over the configured level
//!
//! # Design Decisions
//! - Library code only emits events; installing a subscriber is the caller's choice
//! - Logs go to stderr so JSON output on stdout stays machine-readable

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter: `RUST_LOG` when set, otherwise `web3_gateway=<level>`.
pub fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("web3_gateway={level}")))
}

/// Install the global subscriber. A second call is ignored.
pub fn init(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(filter(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
