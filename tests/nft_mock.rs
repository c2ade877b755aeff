//! ERC-721 enumeration against a mock node plus an HTTP metadata host.

use std::collections::HashMap;

use alloy::hex;
use alloy::primitives::{address, Address, Bytes, U256};
use alloy::sol_types::{SolCall, SolValue};
use serde_json::{json, Value};
use web3_gateway::blockchain::client::BlockchainClient;
use web3_gateway::blockchain::nft::{
    collect_owner_nfts, get_all_nfts_in_collection, get_all_nfts_in_collection_with,
    get_nfts_from_address, get_nfts_from_address_with, Erc721Source, HttpMetadataFetcher,
};
use web3_gateway::blockchain::tokens::IERC721;
use web3_gateway::blockchain::{EnumerationOptions, FailurePolicy};

mod common;

const COLLECTION: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
const OWNER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Owner holds 10 and 11; the collection also has 12, whose metadata is missing.
const OWNED: [u64; 2] = [10, 11];
const SUPPLY: [u64; 3] = [10, 11, 12];

fn encoded<T: SolValue>(value: T) -> Value {
    json!(Bytes::from((value,).abi_encode_params()))
}

fn index_of(index: U256, tokens: &[u64]) -> Result<Value, String> {
    tokens
        .get(index.to::<usize>())
        .map(|id| encoded(U256::from(*id)))
        .ok_or_else(|| "index out of bounds".to_string())
}

/// Answer an ERC-721 `eth_call` by decoding its calldata.
fn collection_call(input: &[u8], metadata_url: &str) -> Result<Value, String> {
    if let Ok(call) = IERC721::balanceOfCall::abi_decode(input) {
        assert_eq!(call.owner, OWNER);
        return Ok(encoded(U256::from(OWNED.len())));
    }
    if let Ok(call) = IERC721::tokenOfOwnerByIndexCall::abi_decode(input) {
        assert_eq!(call.owner, OWNER);
        return index_of(call.index, &OWNED);
    }
    if IERC721::totalSupplyCall::abi_decode(input).is_ok() {
        return Ok(encoded(U256::from(SUPPLY.len())));
    }
    if let Ok(call) = IERC721::tokenByIndexCall::abi_decode(input) {
        return index_of(call.index, &SUPPLY);
    }
    if let Ok(call) = IERC721::tokenURICall::abi_decode(input) {
        return Ok(encoded(format!("{metadata_url}/metadata/{}", call.tokenId)));
    }
    Err(format!("unexpected call 0x{}", hex::encode(input)))
}

async fn start_collection() -> String {
    let documents = HashMap::from([
        (
            "10".to_string(),
            json!({
                "name": "n10",
                "description": "ten",
                "image": "ipfs://QmTen",
                "attributes": [{ "trait_type": "rank", "value": 1 }]
            }),
        ),
        ("11".to_string(), json!({ "name": "n11" })),
    ]);
    let metadata_url = common::start_metadata_host(documents).await;

    common::start_rpc_node(move |method, params| match method {
        "eth_call" => {
            let to: Address = params[0]["to"].as_str().unwrap().parse().unwrap();
            assert_eq!(to, COLLECTION);
            let input = params[0]
                .get("input")
                .or_else(|| params[0].get("data"))
                .and_then(Value::as_str)
                .unwrap_or("0x");
            collection_call(&hex::decode(input).unwrap(), &metadata_url)
        }
        other => Err(format!("unexpected method {other}")),
    })
    .await
}

#[tokio::test]
async fn test_owner_nfts_with_metadata_and_placeholders() {
    let url = start_collection().await;

    let nfts = get_nfts_from_address(OWNER, COLLECTION, &url).await.unwrap();

    let summary: Vec<_> = nfts
        .iter()
        .map(|n| (n.token_id.as_str(), n.name.as_str()))
        .collect();
    assert_eq!(summary, vec![("10", "n10"), ("11", "n11")]);

    assert_eq!(nfts[0].description, "ten");
    assert_eq!(nfts[0].image, "ipfs://QmTen");
    assert!(nfts[0].attributes.is_array());

    assert_eq!(nfts[1].description, "No description");
    assert_eq!(nfts[1].image, "No image");
    assert_eq!(nfts[1].attributes, json!("No attributes"));
}

#[tokio::test]
async fn test_owner_nfts_respect_limit() {
    let url = start_collection().await;
    let options = EnumerationOptions::default().with_limit(1);

    let nfts = get_nfts_from_address_with(OWNER, COLLECTION, &url, &options)
        .await
        .unwrap();
    assert_eq!(nfts.len(), 1);
    assert_eq!(nfts[0].token_id, "10");
}

#[tokio::test]
async fn test_collection_aborts_on_missing_metadata() {
    let url = start_collection().await;
    assert!(get_all_nfts_in_collection(COLLECTION, &url).await.is_err());
}

#[tokio::test]
async fn test_collection_skips_missing_metadata_when_asked() {
    let url = start_collection().await;
    let options = EnumerationOptions::default().with_failure_policy(FailurePolicy::Skip);

    let nfts = get_all_nfts_in_collection_with(COLLECTION, &url, &options)
        .await
        .unwrap();
    let ids: Vec<_> = nfts.iter().map(|n| n.token_id.as_str()).collect();
    assert_eq!(ids, vec!["10", "11"]);
}

#[tokio::test]
async fn test_erc721_source_with_http_fetcher() {
    let url = start_collection().await;
    let client = BlockchainClient::connect(&url).unwrap();
    let source = Erc721Source::new(COLLECTION, &client);
    let fetcher = HttpMetadataFetcher::new(reqwest::Client::new());

    let nfts = collect_owner_nfts(&source, &fetcher, OWNER, &EnumerationOptions::default())
        .await
        .unwrap();
    assert_eq!(nfts.len(), 2);
    assert_eq!(nfts[1].token_id, "11");
}
