//! Sequential on-chain enumeration.
//!
//! Items are fetched one at a time, in index order, each awaited before the
//! next is requested. The default policy has no upper bound and aborts on the
//! first failure, discarding everything collected so far.

use std::fmt::Display;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::observability::metrics;

/// What to do when fetching one item fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Return the error; no partial results.
    #[default]
    Abort,
    /// Log the failure and continue with the next index.
    Skip,
}

/// Bounds and failure handling for an enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationOptions {
    /// Maximum number of items to fetch. `None` fetches everything.
    pub limit: Option<u64>,
    /// Failure handling.
    pub on_failure: FailurePolicy,
}

impl EnumerationOptions {
    /// Fetch at most `limit` items.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }
}

/// Fetch one item per index, strictly in order.
///
/// # Arguments
/// * `kind` - Label used in logs and metrics
/// * `indices` - Indices to visit, in visiting order
/// * `options` - Bound and failure policy
/// * `fetch` - Fetches the item at an index
pub async fn enumerate_sequential<I, T, E, F, Fut>(
    kind: &'static str,
    indices: I,
    options: &EnumerationOptions,
    mut fetch: F,
) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = u64>,
    E: Display,
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let limit = options
        .limit
        .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

    let mut items = Vec::new();
    for index in indices.into_iter().take(limit) {
        match fetch(index).await {
            Ok(item) => items.push(item),
            Err(e) => match options.on_failure {
                FailurePolicy::Abort => {
                    tracing::warn!(kind, index, error = %e, "Enumeration aborted");
                    return Err(e);
                }
                FailurePolicy::Skip => {
                    tracing::warn!(kind, index, error = %e, "Skipping failed item");
                }
            },
        }
    }

    tracing::debug!(kind, count = items.len(), "Enumeration complete");
    metrics::record_enumerated(kind, items.len());

    Ok(items)
}
