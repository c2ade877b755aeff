//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stdout via tracing-subscriber (CLI)
//!     → whatever recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event, never formatted secrets
//! - The library installs no metrics exporter; without a recorder the
//!   counters are no-ops

pub mod logging;
pub mod metrics;
