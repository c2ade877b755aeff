//! ERC-20 and ERC-721 bindings and the token operations built on them.

use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionReceipt;
use alloy::sol;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::transaction::{wait_for_confirmations, DEFAULT_POLL_INTERVAL};
use crate::blockchain::types::{BlockchainResult, GasSettings};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

sol! {
    /// Fungible token surface used by the gateway.
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }

    /// Enumerable, mintable NFT surface used by the gateway.
    #[sol(rpc)]
    interface IERC721 {
        function balanceOf(address owner) external view returns (uint256);
        function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function tokenByIndex(uint256 index) external view returns (uint256);
        function tokenURI(uint256 tokenId) external view returns (string);
        function safeMint(address to, uint256 tokenId) external;
    }
}

/// ERC-20 balance of `owner`, in the token's base units.
pub async fn get_token_balance(
    owner: Address,
    token: Address,
    rpc_url: &str,
) -> BlockchainResult<U256> {
    let client = BlockchainClient::connect(rpc_url)?;
    let erc20 = IERC20::new(token, client.provider().clone());

    metrics::record_rpc_call("erc20_balanceOf");
    Ok(erc20.balanceOf(owner).call().await?)
}

/// Transfer `amount` base units of an ERC-20 token.
pub async fn transfer_tokens(
    from_private_key: &str,
    to: Address,
    amount: U256,
    token: Address,
    gas: GasSettings,
    rpc_url: &str,
) -> BlockchainResult<TxHash> {
    let wallet = Wallet::from_private_key(from_private_key)?;
    let client = BlockchainClient::connect_with_wallet(rpc_url, &wallet)?;
    let erc20 = IERC20::new(token, client.provider().clone());

    metrics::record_rpc_call("erc20_transfer");
    let pending = erc20
        .transfer(to, amount)
        .gas_price(gas.gas_price)
        .gas(gas.gas_limit)
        .send()
        .await?;
    let tx_hash = *pending.tx_hash();

    tracing::info!(token = %token, to = %to, tx_hash = %tx_hash, "Token transfer broadcast");

    Ok(tx_hash)
}

/// Call `safeMint(to, tokenId)` and wait for one confirmation.
pub async fn safe_mint_nft(
    collection: Address,
    to: Address,
    token_id: U256,
    private_key: &str,
    gas: GasSettings,
    rpc_url: &str,
) -> BlockchainResult<TransactionReceipt> {
    let wallet = Wallet::from_private_key(private_key)?;
    let client = BlockchainClient::connect_with_wallet(rpc_url, &wallet)?;
    let erc721 = IERC721::new(collection, client.provider().clone());

    metrics::record_rpc_call("erc721_safeMint");
    let pending = erc721
        .safeMint(to, token_id)
        .gas_price(gas.gas_price)
        .gas(gas.gas_limit)
        .send()
        .await?;
    let tx_hash = *pending.tx_hash();

    tracing::info!(collection = %collection, token_id = %token_id, tx_hash = %tx_hash, "Mint broadcast");

    wait_for_confirmations(&client, tx_hash, 1, DEFAULT_POLL_INTERVAL).await
}
