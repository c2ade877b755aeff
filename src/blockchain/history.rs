//! Transaction history by nonce.
//!
//! Reads the sender's current nonce N, then looks up nonces N-1 down to 0, one
//! round trip each. Cost grows linearly with the account's activity.

use alloy::primitives::Address;
use alloy::rpc::types::Transaction;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::enumerate::{enumerate_sequential, EnumerationOptions};
use crate::blockchain::types::BlockchainResult;

/// Source of per-nonce transaction lookups.
#[allow(async_fn_in_trait)]
pub trait NonceLookup {
    /// What one lookup yields.
    type Transaction;

    /// Number of transactions sent by `address`.
    async fn transaction_count(&self, address: Address) -> BlockchainResult<u64>;

    /// The transaction `address` sent with `nonce`.
    async fn transaction_by_nonce(
        &self,
        address: Address,
        nonce: u64,
    ) -> BlockchainResult<Self::Transaction>;
}

impl NonceLookup for BlockchainClient {
    type Transaction = Option<Transaction>;

    async fn transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        self.get_transaction_count(address).await
    }

    async fn transaction_by_nonce(
        &self,
        address: Address,
        nonce: u64,
    ) -> BlockchainResult<Self::Transaction> {
        self.get_transaction_by_nonce(address, nonce).await
    }
}

/// Collect the history of `address`, newest first.
pub async fn collect_history<L: NonceLookup>(
    lookup: &L,
    address: Address,
    options: &EnumerationOptions,
) -> BlockchainResult<Vec<L::Transaction>> {
    let count = lookup.transaction_count(address).await?;

    tracing::debug!(address = %address, count, "Walking transaction history");

    enumerate_sequential("transaction_history", (0..count).rev(), options, |nonce| {
        lookup.transaction_by_nonce(address, nonce)
    })
    .await
}

/// Every transaction sent by `address`, newest first.
///
/// Entries are `None` where the node has no record for a nonce.
pub async fn get_transaction_history(
    address: Address,
    rpc_url: &str,
) -> BlockchainResult<Vec<Option<Transaction>>> {
    get_transaction_history_with(address, rpc_url, &EnumerationOptions::default()).await
}

/// [`get_transaction_history`] with an explicit bound and failure policy.
pub async fn get_transaction_history_with(
    address: Address,
    rpc_url: &str,
    options: &EnumerationOptions,
) -> BlockchainResult<Vec<Option<Transaction>>> {
    let client = BlockchainClient::connect(rpc_url)?;
    collect_history(&client, address, options).await
}
