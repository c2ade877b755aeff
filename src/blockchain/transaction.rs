//! Transaction building, submission and confirmation monitoring.
//!
//! # Responsibilities
//! - Build transactions with caller-supplied gas parameters
//! - Sign and broadcast through a signer-bound client
//! - Wait for a number of confirmations (no timeout)

use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::Provider;
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use tokio::time::interval;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainResult, GasSettings};
use crate::blockchain::units;
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

/// Confirmations awaited when the caller has no preference.
pub const DEFAULT_CONFIRMATIONS: u64 = 1;

/// Delay between receipt polls while waiting for confirmations.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Build a transaction request with explicit gas parameters.
///
/// # Arguments
/// * `to` - Destination address
/// * `value` - Amount of native token to send, in wei
/// * `data` - Call data (empty for simple transfers)
/// * `gas` - Gas price and limit, already in base units
pub fn build_request(to: Address, value: U256, data: Bytes, gas: GasSettings) -> TransactionRequest {
    TransactionRequest::default()
        .with_to(to)
        .with_value(value)
        .with_input(data)
        .with_gas_price(gas.gas_price)
        .with_gas_limit(gas.gas_limit)
}

/// Sign and broadcast `tx` through a signer-bound client.
///
/// Nonce and chain id are filled by the provider.
pub async fn submit(client: &BlockchainClient, tx: TransactionRequest) -> BlockchainResult<TxHash> {
    metrics::record_rpc_call("eth_sendRawTransaction");
    let pending = client.provider().send_transaction(tx).await?;
    let tx_hash = *pending.tx_hash();

    tracing::info!(tx_hash = %tx_hash, "Transaction broadcast");

    Ok(tx_hash)
}

/// Send `amount` ether from the wallet behind `from_private_key` to `to`.
///
/// # Arguments
/// * `amount` - Decimal ether string
/// * `gas_price` - Decimal gwei string
/// * `gas_limit` - Gas limit
pub async fn send_transaction(
    from_private_key: &str,
    to: Address,
    amount: &str,
    gas_price: &str,
    gas_limit: u64,
    rpc_url: &str,
) -> BlockchainResult<TxHash> {
    let value = units::parse_ether(amount)?;
    let gas = GasSettings::from_gwei(gas_price, gas_limit)?;
    let wallet = Wallet::from_private_key(from_private_key)?;

    let client = BlockchainClient::connect_with_wallet(rpc_url, &wallet)?;
    submit(&client, build_request(to, value, Bytes::new(), gas)).await
}

/// Wait until `tx_hash` has `confirmations` confirmations and return its receipt.
///
/// The block containing the transaction counts as the first confirmation; a
/// value of zero is treated as one. There is no timeout: this keeps polling
/// for as long as the transaction stays unmined.
pub async fn wait_for_confirmations(
    client: &BlockchainClient,
    tx_hash: TxHash,
    confirmations: u64,
    poll_interval: Duration,
) -> BlockchainResult<TransactionReceipt> {
    let required = confirmations.max(1);
    let mut ticker = interval(poll_interval);

    loop {
        ticker.tick().await;

        let receipt = match client.get_transaction_receipt(tx_hash).await? {
            Some(r) => r,
            None => {
                tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                continue;
            }
        };

        let Some(tx_block) = receipt.block_number else {
            tracing::debug!(tx_hash = %tx_hash, "Receipt not yet in a block");
            continue;
        };

        let current_block = client.get_block_number().await?;
        let seen = current_block.saturating_sub(tx_block) + 1;

        if seen >= required {
            tracing::info!(
                tx_hash = %tx_hash,
                block_number = tx_block,
                confirmations = seen,
                "Transaction confirmed"
            );
            return Ok(receipt);
        }

        tracing::debug!(
            tx_hash = %tx_hash,
            confirmations = seen,
            required = required,
            "Waiting for confirmations"
        );
    }
}

/// Block until `tx_hash` reaches `confirmations` confirmations, then return the receipt.
pub async fn wait_for_transaction(
    tx_hash: TxHash,
    rpc_url: &str,
    confirmations: u64,
) -> BlockchainResult<TransactionReceipt> {
    let client = BlockchainClient::connect(rpc_url)?;
    wait_for_confirmations(&client, tx_hash, confirmations, DEFAULT_POLL_INTERVAL).await
}
