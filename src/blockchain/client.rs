//! Blockchain RPC client and one-shot read operations.
//!
//! # Responsibilities
//! - Connect to a JSON-RPC endpoint (a fresh connection per operation)
//! - Query chain state (block number, balances, nonces, blocks, transactions)
//! - Bind a local signer for state-changing calls
//!
//! Library errors are forwarded as-is; nothing is retried.

use alloy::eips::BlockNumberOrTag;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256, U64};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{Block, Transaction, TransactionReceipt, TransactionRequest};
use url::Url;

use crate::blockchain::types::BlockchainResult;
use crate::blockchain::units;
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

/// Non-standard lookup of a sender's transaction by nonce (served by reth, Nethermind, Erigon).
pub const TRANSACTION_BY_NONCE_METHOD: &str = "eth_getTransactionBySenderAndNonce";

/// Blockchain RPC client bound to a single endpoint.
#[derive(Clone)]
pub struct BlockchainClient {
    provider: DynProvider,
    rpc_url: Url,
}

impl BlockchainClient {
    /// Create a read-only client. No request is sent until an operation is called.
    pub fn connect(rpc_url: &str) -> BlockchainResult<Self> {
        let url: Url = rpc_url.parse()?;
        let provider = ProviderBuilder::new().connect_http(url.clone()).erased();
        Ok(Self {
            provider,
            rpc_url: url,
        })
    }

    /// Create a client whose transactions are signed by `wallet`.
    pub fn connect_with_wallet(rpc_url: &str, wallet: &Wallet) -> BlockchainResult<Self> {
        let url: Url = rpc_url.parse()?;
        let provider = ProviderBuilder::new()
            .wallet(wallet.signer().clone())
            .connect_http(url.clone())
            .erased();

        tracing::debug!(signer = %wallet.address(), "Signer bound to provider");

        Ok(Self {
            provider,
            rpc_url: url,
        })
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<u64> {
        metrics::record_rpc_call("eth_chainId");
        Ok(self.provider.get_chain_id().await?)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        metrics::record_rpc_call("eth_blockNumber");
        Ok(self.provider.get_block_number().await?)
    }

    /// Get the balance of an address in wei.
    pub async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        metrics::record_rpc_call("eth_getBalance");
        Ok(self.provider.get_balance(address).await?)
    }

    /// Get the transaction count (nonce) for an address.
    pub async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        metrics::record_rpc_call("eth_getTransactionCount");
        Ok(self.provider.get_transaction_count(address).await?)
    }

    /// Get a block by number. `full` includes transaction bodies instead of hashes.
    pub async fn get_block(&self, number: u64, full: bool) -> BlockchainResult<Option<Block>> {
        metrics::record_rpc_call("eth_getBlockByNumber");
        let request = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number));
        let block = if full {
            request.full().await?
        } else {
            request.await?
        };
        Ok(block)
    }

    /// Get a transaction by hash.
    pub async fn get_transaction(&self, tx_hash: TxHash) -> BlockchainResult<Option<Transaction>> {
        metrics::record_rpc_call("eth_getTransactionByHash");
        Ok(self.provider.get_transaction_by_hash(tx_hash).await?)
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        metrics::record_rpc_call("eth_getTransactionReceipt");
        Ok(self.provider.get_transaction_receipt(tx_hash).await?)
    }

    /// Get the transaction `sender` sent with `nonce`.
    pub async fn get_transaction_by_nonce(
        &self,
        sender: Address,
        nonce: u64,
    ) -> BlockchainResult<Option<Transaction>> {
        metrics::record_rpc_call(TRANSACTION_BY_NONCE_METHOD);
        Ok(self
            .provider
            .raw_request(TRANSACTION_BY_NONCE_METHOD.into(), (sender, U64::from(nonce)))
            .await?)
    }

    /// Estimate the gas a call would use.
    pub async fn estimate_gas(&self, tx: TransactionRequest) -> BlockchainResult<u64> {
        metrics::record_rpc_call("eth_estimateGas");
        Ok(self.provider.estimate_gas(tx).await?)
    }

    /// Get the underlying provider.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Endpoint this client talks to.
    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.rpc_url.as_str())
            .finish()
    }
}

/// Balance of `address` as a decimal ether string.
pub async fn get_balance(address: Address, rpc_url: &str) -> BlockchainResult<String> {
    let balance = BlockchainClient::connect(rpc_url)?.get_balance(address).await?;
    Ok(units::format_ether(balance))
}

/// Number of transactions sent from `address`.
pub async fn get_transaction_count(address: Address, rpc_url: &str) -> BlockchainResult<u64> {
    BlockchainClient::connect(rpc_url)?
        .get_transaction_count(address)
        .await
}

/// Chain id reported by the endpoint.
pub async fn get_network_id(rpc_url: &str) -> BlockchainResult<u64> {
    BlockchainClient::connect(rpc_url)?.get_chain_id().await
}

/// Latest block number.
pub async fn get_block_number(rpc_url: &str) -> BlockchainResult<u64> {
    BlockchainClient::connect(rpc_url)?.get_block_number().await
}

/// Block `number` including full transaction bodies.
pub async fn get_block_details(number: u64, rpc_url: &str) -> BlockchainResult<Option<Block>> {
    BlockchainClient::connect(rpc_url)?.get_block(number, true).await
}

/// Transactions included in block `number`, or `None` if the block is unknown.
pub async fn get_transactions_in_block(
    number: u64,
    rpc_url: &str,
) -> BlockchainResult<Option<Vec<Transaction>>> {
    let block = BlockchainClient::connect(rpc_url)?.get_block(number, true).await?;
    Ok(block.map(|b| {
        b.transactions
            .as_transactions()
            .map(<[Transaction]>::to_vec)
            .unwrap_or_default()
    }))
}

/// Transaction by hash.
pub async fn get_transaction(
    tx_hash: TxHash,
    rpc_url: &str,
) -> BlockchainResult<Option<Transaction>> {
    BlockchainClient::connect(rpc_url)?.get_transaction(tx_hash).await
}

/// Gas estimate for sending `value` ether and `data` from `from` to `to`.
pub async fn estimate_gas(
    from: Address,
    to: Address,
    value: &str,
    data: Bytes,
    rpc_url: &str,
) -> BlockchainResult<u64> {
    let tx = TransactionRequest::default()
        .with_from(from)
        .with_to(to)
        .with_value(units::parse_ether(value)?)
        .with_input(data);

    BlockchainClient::connect(rpc_url)?.estimate_gas(tx).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::BlockchainError;

    #[test]
    fn test_connect_does_not_touch_network() {
        let client = BlockchainClient::connect("http://localhost:8545").unwrap();
        assert_eq!(client.rpc_url().as_str(), "http://localhost:8545/");
    }

    #[test]
    fn test_connect_rejects_bad_url() {
        let result = BlockchainClient::connect("not a url");
        assert!(matches!(result, Err(BlockchainError::Url(_))));
    }

    #[tokio::test]
    async fn test_estimate_gas_rejects_bad_value_before_io() {
        let result = estimate_gas(
            Address::ZERO,
            Address::ZERO,
            "1.2.3",
            Bytes::new(),
            "http://127.0.0.1:1",
        )
        .await;
        assert!(matches!(result, Err(BlockchainError::Units(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_propagates_error() {
        let result = get_block_number("http://127.0.0.1:1").await;
        assert!(matches!(result, Err(BlockchainError::Rpc(_))));
    }
}
