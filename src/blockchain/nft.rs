//! NFT enumeration with off-chain metadata.
//!
//! # Data Flow
//! ```text
//! balanceOf(owner) | totalSupply()          → item count
//!     → tokenOfOwnerByIndex | tokenByIndex  → token id      ┐
//!     → tokenURI(token id)                  → metadata URI  │ once per index,
//!     → HTTP GET (ipfs:// via gateway)      → JSON document ┘ sequentially
//!     → NftMetadata with placeholders for missing fields
//! ```

use alloy::primitives::{Address, U256};
use alloy::providers::DynProvider;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::enumerate::{enumerate_sequential, EnumerationOptions};
use crate::blockchain::tokens::IERC721;
use crate::blockchain::types::BlockchainResult;
use crate::observability::metrics;

/// Public gateway used to fetch `ipfs://` metadata.
pub const IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

const UNNAMED: &str = "Unnamed NFT";
const NO_DESCRIPTION: &str = "No description";
const NO_IMAGE: &str = "No image";
const NO_ATTRIBUTES: &str = "No attributes";

/// Token id plus its display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftMetadata {
    pub token_id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub attributes: Value,
}

impl NftMetadata {
    /// Build from a metadata document, substituting placeholders for missing
    /// or empty fields.
    pub fn from_document(token_id: U256, document: &Value) -> Self {
        let text = |key: &str, fallback: &str| {
            document
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };

        let attributes = match document.get("attributes") {
            None | Some(Value::Null) => Value::String(NO_ATTRIBUTES.to_string()),
            Some(Value::String(s)) if s.is_empty() => Value::String(NO_ATTRIBUTES.to_string()),
            Some(other) => other.clone(),
        };

        Self {
            token_id: token_id.to_string(),
            name: text("name", UNNAMED),
            description: text("description", NO_DESCRIPTION),
            image: text("image", NO_IMAGE),
            attributes,
        }
    }
}

/// Rewrite `ipfs://` URIs to the public HTTP gateway; others pass through.
pub fn http_link(uri: &str) -> String {
    match uri.strip_prefix("ipfs://") {
        Some(path) => format!("{IPFS_GATEWAY}{}", path.trim_start_matches("ipfs/")),
        None => uri.to_string(),
    }
}

/// On-chain side of an enumerable ERC-721 collection.
#[allow(async_fn_in_trait)]
pub trait NftSource {
    async fn balance_of(&self, owner: Address) -> BlockchainResult<U256>;
    async fn token_of_owner_by_index(&self, owner: Address, index: U256)
        -> BlockchainResult<U256>;
    async fn total_supply(&self) -> BlockchainResult<U256>;
    async fn token_by_index(&self, index: U256) -> BlockchainResult<U256>;
    async fn token_uri(&self, token_id: U256) -> BlockchainResult<String>;
}

/// Off-chain side: turns a token URI into a JSON document.
#[allow(async_fn_in_trait)]
pub trait MetadataFetcher {
    async fn fetch(&self, uri: &str) -> BlockchainResult<Value>;
}

/// [`NftSource`] backed by a deployed ERC-721 contract.
pub struct Erc721Source {
    contract: IERC721::IERC721Instance<DynProvider>,
}

impl Erc721Source {
    pub fn new(collection: Address, client: &BlockchainClient) -> Self {
        Self {
            contract: IERC721::new(collection, client.provider().clone()),
        }
    }
}

impl NftSource for Erc721Source {
    async fn balance_of(&self, owner: Address) -> BlockchainResult<U256> {
        metrics::record_rpc_call("erc721_balanceOf");
        Ok(self.contract.balanceOf(owner).call().await?)
    }

    async fn token_of_owner_by_index(
        &self,
        owner: Address,
        index: U256,
    ) -> BlockchainResult<U256> {
        metrics::record_rpc_call("erc721_tokenOfOwnerByIndex");
        Ok(self.contract.tokenOfOwnerByIndex(owner, index).call().await?)
    }

    async fn total_supply(&self) -> BlockchainResult<U256> {
        metrics::record_rpc_call("erc721_totalSupply");
        Ok(self.contract.totalSupply().call().await?)
    }

    async fn token_by_index(&self, index: U256) -> BlockchainResult<U256> {
        metrics::record_rpc_call("erc721_tokenByIndex");
        Ok(self.contract.tokenByIndex(index).call().await?)
    }

    async fn token_uri(&self, token_id: U256) -> BlockchainResult<String> {
        metrics::record_rpc_call("erc721_tokenURI");
        Ok(self.contract.tokenURI(token_id).call().await?)
    }
}

/// [`MetadataFetcher`] over plain HTTP(S).
#[derive(Debug, Clone, Default)]
pub struct HttpMetadataFetcher {
    http: reqwest::Client,
}

impl HttpMetadataFetcher {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl MetadataFetcher for HttpMetadataFetcher {
    async fn fetch(&self, uri: &str) -> BlockchainResult<Value> {
        let url = http_link(uri);
        tracing::debug!(url = %url, "Fetching NFT metadata");

        let document = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(document)
    }
}

async fn describe<F: MetadataFetcher, S: NftSource>(
    source: &S,
    fetcher: &F,
    token_id: U256,
) -> BlockchainResult<NftMetadata> {
    let uri = source.token_uri(token_id).await?;
    let document = fetcher.fetch(&uri).await?;
    Ok(NftMetadata::from_document(token_id, &document))
}

/// Enumerate the tokens held by `owner`.
pub async fn collect_owner_nfts<S: NftSource, F: MetadataFetcher>(
    source: &S,
    fetcher: &F,
    owner: Address,
    options: &EnumerationOptions,
) -> BlockchainResult<Vec<NftMetadata>> {
    let balance: u64 = source.balance_of(owner).await?.saturating_to();

    enumerate_sequential("owner_nfts", 0..balance, options, |index| async move {
        let token_id = source
            .token_of_owner_by_index(owner, U256::from(index))
            .await?;
        describe(source, fetcher, token_id).await
    })
    .await
}

/// Enumerate every token in the collection.
pub async fn collect_collection_nfts<S: NftSource, F: MetadataFetcher>(
    source: &S,
    fetcher: &F,
    options: &EnumerationOptions,
) -> BlockchainResult<Vec<NftMetadata>> {
    let supply: u64 = source.total_supply().await?.saturating_to();

    enumerate_sequential("collection_nfts", 0..supply, options, |index| async move {
        let token_id = source.token_by_index(U256::from(index)).await?;
        describe(source, fetcher, token_id).await
    })
    .await
}

/// NFTs of `collection` held by `owner`, with metadata.
pub async fn get_nfts_from_address(
    owner: Address,
    collection: Address,
    rpc_url: &str,
) -> BlockchainResult<Vec<NftMetadata>> {
    get_nfts_from_address_with(owner, collection, rpc_url, &EnumerationOptions::default()).await
}

/// [`get_nfts_from_address`] with an explicit bound and failure policy.
pub async fn get_nfts_from_address_with(
    owner: Address,
    collection: Address,
    rpc_url: &str,
    options: &EnumerationOptions,
) -> BlockchainResult<Vec<NftMetadata>> {
    let client = BlockchainClient::connect(rpc_url)?;
    collect_owner_nfts(
        &Erc721Source::new(collection, &client),
        &HttpMetadataFetcher::default(),
        owner,
        options,
    )
    .await
}

/// Every NFT of `collection`, with metadata.
pub async fn get_all_nfts_in_collection(
    collection: Address,
    rpc_url: &str,
) -> BlockchainResult<Vec<NftMetadata>> {
    get_all_nfts_in_collection_with(collection, rpc_url, &EnumerationOptions::default()).await
}

/// [`get_all_nfts_in_collection`] with an explicit bound and failure policy.
pub async fn get_all_nfts_in_collection_with(
    collection: Address,
    rpc_url: &str,
    options: &EnumerationOptions,
) -> BlockchainResult<Vec<NftMetadata>> {
    let client = BlockchainClient::connect(rpc_url)?;
    collect_collection_nfts(
        &Erc721Source::new(collection, &client),
        &HttpMetadataFetcher::default(),
        options,
    )
    .await
}
