//! Session wrapper over an injected WalletConnect bridge.

use alloy::primitives::{hex, Address, Bytes, TxHash};
use serde_json::{json, Value};
use thiserror::Error;

use crate::blockchain::transaction::build_request;
use crate::blockchain::types::{BlockchainError, GasSettings};
use crate::blockchain::units;

/// Transport to a remote wallet.
#[allow(async_fn_in_trait)]
pub trait WalletConnectBridge {
    /// Transport failure type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open the session; the wallet user approves the connection.
    async fn enable(&mut self) -> Result<(), Self::Error>;

    /// Forward one JSON-RPC request to the wallet.
    async fn request(&mut self, method: &str, params: Value) -> Result<Value, Self::Error>;

    /// Close the session.
    async fn disconnect(&mut self) -> Result<(), Self::Error>;
}

/// Errors from WalletConnect helpers.
#[derive(Debug, Error)]
pub enum WalletConnectError {
    #[error("wallet bridge error: {0}")]
    Bridge(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Units(#[from] alloy::primitives::utils::UnitsError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("wallet reported no accounts")]
    NoAccounts,
}

/// Result type for WalletConnect operations.
pub type WalletConnectResult<T> = Result<T, WalletConnectError>;

fn bridge_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> WalletConnectError {
    WalletConnectError::Bridge(Box::new(e))
}

/// An enabled session bound to one chain.
#[derive(Debug)]
pub struct WalletConnectSession<B> {
    bridge: B,
    rpc_url: String,
    chain_id: u64,
}

impl<B: WalletConnectBridge> WalletConnectSession<B> {
    /// Enable `bridge` and wrap it.
    ///
    /// `rpc_url` and `chain_id` describe the network the wallet was set up for.
    pub async fn connect(
        mut bridge: B,
        rpc_url: impl Into<String>,
        chain_id: u64,
    ) -> WalletConnectResult<Self> {
        bridge.enable().await.map_err(bridge_error)?;
        let rpc_url = rpc_url.into();

        tracing::info!(chain_id, rpc_url = %rpc_url, "WalletConnect session enabled");

        Ok(Self {
            bridge,
            rpc_url,
            chain_id,
        })
    }

    /// First account the wallet exposes.
    pub async fn connected_address(&mut self) -> WalletConnectResult<Address> {
        let accounts = self
            .bridge
            .request("eth_accounts", json!([]))
            .await
            .map_err(bridge_error)?;
        let accounts: Vec<Address> = serde_json::from_value(accounts)?;
        accounts.into_iter().next().ok_or(WalletConnectError::NoAccounts)
    }

    /// Ask the wallet to sign and send a value transfer.
    ///
    /// # Arguments
    /// * `to` - Recipient
    /// * `amount` - Decimal ether string
    /// * `gas_price` - Decimal gwei string
    /// * `gas_limit` - Gas limit
    pub async fn send_transaction(
        &mut self,
        to: Address,
        amount: &str,
        gas_price: &str,
        gas_limit: u64,
    ) -> WalletConnectResult<TxHash> {
        let value = units::parse_ether(amount)?;
        let gas = GasSettings::from_gwei(gas_price, gas_limit)?;
        let tx = build_request(to, value, Bytes::new(), gas);

        let result = self
            .bridge
            .request("eth_sendTransaction", json!([tx]))
            .await
            .map_err(bridge_error)?;
        let tx_hash: TxHash = serde_json::from_value(result)?;

        tracing::info!(tx_hash = %tx_hash, to = %to, "Wallet sent transaction");

        Ok(tx_hash)
    }

    /// Ask the wallet to `personal_sign` a UTF-8 message with the connected account.
    ///
    /// Returns the signature as the wallet encodes it (0x hex).
    pub async fn sign_message(&mut self, message: &str) -> WalletConnectResult<String> {
        let address = self.connected_address().await?;
        let params = json!([hex::encode_prefixed(message.as_bytes()), address]);

        let signature = self
            .bridge
            .request("personal_sign", params)
            .await
            .map_err(bridge_error)?;

        Ok(serde_json::from_value(signature)?)
    }

    /// Close the session.
    pub async fn disconnect(mut self) -> WalletConnectResult<()> {
        self.bridge.disconnect().await.map_err(bridge_error)?;
        tracing::info!(chain_id = self.chain_id, "WalletConnect session closed");
        Ok(())
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}
