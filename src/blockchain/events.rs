//! Contract event subscription.
//!
//! Logs are polled through the endpoint's filter API and decoded against the
//! ABI event. Each matching event is handed to the callback as its positional
//! arguments. The returned task handle is the only teardown mechanism.

use alloy::dyn_abi::{DynSolValue, EventExt};
use alloy::json_abi::{Event, JsonAbi};
use alloy::primitives::{Address, LogData};
use alloy::providers::Provider;
use alloy::rpc::types::Filter;
use futures_util::StreamExt;
use tokio::task::JoinHandle;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::observability::metrics;

/// Decode a log into the event's arguments in declaration order.
///
/// Indexed and non-indexed parameters are merged back into one sequence.
pub fn event_arguments(event: &Event, log: &LogData) -> BlockchainResult<Vec<DynSolValue>> {
    let decoded = event.decode_log(log)?;
    let mut indexed = decoded.indexed.into_iter();
    let mut body = decoded.body.into_iter();

    Ok(event
        .inputs
        .iter()
        .filter_map(|input| {
            if input.indexed {
                indexed.next()
            } else {
                body.next()
            }
        })
        .collect())
}

/// Invoke `callback` for every `event_name` emitted by `contract`.
///
/// Delivery order is whatever the node returns; nothing is replayed after a
/// disconnect.
pub async fn listen_to_contract_events<F>(
    contract: Address,
    abi: &JsonAbi,
    event_name: &str,
    callback: F,
    rpc_url: &str,
) -> BlockchainResult<JoinHandle<()>>
where
    F: Fn(Vec<DynSolValue>) + Send + 'static,
{
    let event = abi
        .event(event_name)
        .and_then(|overloads| overloads.first())
        .cloned()
        .ok_or_else(|| BlockchainError::UnknownEvent(event_name.to_string()))?;

    let client = BlockchainClient::connect(rpc_url)?;
    let filter = Filter::new()
        .address(contract)
        .event_signature(event.selector());

    metrics::record_rpc_call("eth_newFilter");
    let poller = client.provider().watch_logs(&filter).await?;

    tracing::info!(
        contract = %contract,
        event = %event.signature(),
        "Subscribed to contract events"
    );

    let mut logs = poller.into_stream().flat_map(futures_util::stream::iter);
    let handle = tokio::spawn(async move {
        while let Some(log) = logs.next().await {
            match event_arguments(&event, &log.inner.data) {
                Ok(args) => callback(args),
                Err(e) => tracing::warn!(
                    event = %event.name,
                    error = %e,
                    "Dropping undecodable log"
                ),
            }
        }
        tracing::debug!(event = %event.name, "Event stream closed");
    });

    Ok(handle)
}
