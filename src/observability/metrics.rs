//! Metrics collection.
//!
//! # Metrics
//! - `gateway_rpc_calls_total` (counter): JSON-RPC calls by operation
//! - `gateway_ipfs_bytes_total` (counter): IPFS payload bytes by direction (in/out)
//! - `gateway_enumerated_items_total` (counter): items produced by enumerations, by kind
//!
//! # Design Decisions
//! - Uses the `metrics` facade; exposition is left to the embedding process
//! - Label values are static strings to keep cardinality bounded

pub const RPC_CALLS: &str = "gateway_rpc_calls_total";
pub const IPFS_BYTES: &str = "gateway_ipfs_bytes_total";
pub const ENUMERATED_ITEMS: &str = "gateway_enumerated_items_total";

/// Count one outbound RPC call.
pub fn record_rpc_call(operation: &'static str) {
    metrics::counter!(RPC_CALLS, "operation" => operation).increment(1);
}

/// Count IPFS payload bytes moved in `direction`.
pub fn record_ipfs_bytes(direction: &'static str, bytes: usize) {
    metrics::counter!(IPFS_BYTES, "direction" => direction).increment(bytes as u64);
}

/// Count items produced by one enumeration.
pub fn record_enumerated(kind: &'static str, count: usize) {
    metrics::counter!(ENUMERATED_ITEMS, "kind" => kind).increment(count as u64);
}
