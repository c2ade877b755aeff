//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the RPC endpoint resolves (known provider and chain id)
//! - Validate value ranges and URL syntax
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use url::Url;

use crate::config::schema::GatewayConfig;
use crate::endpoint::EndpointError;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Some but not all of provider, api_key and chain_id are set.
    IncompleteProvider,
    /// Provider triple names an unknown provider or network.
    Endpoint(EndpointError),
    /// A URL field does not parse.
    InvalidUrl { field: &'static str, value: String },
    /// Project secret given without a project id.
    SecretWithoutProjectId,
    /// Receipt polling interval is zero.
    ZeroPollInterval,
    /// Log level is not a tracing level.
    UnknownLogLevel(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::IncompleteProvider => {
                write!(f, "rpc: provider, api_key and chain_id must be set together")
            }
            ValidationError::Endpoint(e) => write!(f, "rpc: {}", e),
            ValidationError::InvalidUrl { field, value } => {
                write!(f, "{}: invalid URL '{}'", field, value)
            }
            ValidationError::SecretWithoutProjectId => {
                write!(f, "ipfs: project_secret requires project_id")
            }
            ValidationError::ZeroPollInterval => {
                write!(f, "confirmations: poll_interval_ms must be greater than 0")
            }
            ValidationError::UnknownLogLevel(level) => {
                write!(f, "observability: unknown log level '{}'", level)
            }
        }
    }
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let rpc = &config.rpc;
    if let Some(url) = &rpc.url {
        if Url::parse(url).is_err() {
            errors.push(ValidationError::InvalidUrl {
                field: "rpc.url",
                value: url.clone(),
            });
        }
    } else {
        let set = [
            rpc.provider.is_some(),
            rpc.api_key.is_some(),
            rpc.chain_id.is_some(),
        ];
        if set.iter().any(|s| *s) && !set.iter().all(|s| *s) {
            errors.push(ValidationError::IncompleteProvider);
        } else if let Err(e) = rpc.endpoint() {
            errors.push(ValidationError::Endpoint(e));
        }
    }

    if config.ipfs.base_url().is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "ipfs.url",
            value: config.ipfs.url.clone(),
        });
    }
    if config.ipfs.project_secret.is_some() && config.ipfs.project_id.is_none() {
        errors.push(ValidationError::SecretWithoutProjectId);
    }

    if config.confirmations.poll_interval_ms == 0 {
        errors.push(ValidationError::ZeroPollInterval);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
