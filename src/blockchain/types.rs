//! Chain-specific types and error definitions.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blockchain::units;

/// Errors that can occur during blockchain operations.
///
/// Library failures are forwarded unchanged; only ABI lookups and gas
/// conversion add their own variants.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error(transparent)]
    Rpc(#[from] alloy::transports::TransportError),

    /// Contract binding call failed (revert, decode, transport).
    #[error(transparent)]
    Contract(#[from] alloy::contract::Error),

    /// ABI encoding, decoding or argument coercion failed.
    #[error(transparent)]
    Abi(#[from] alloy::dyn_abi::Error),

    /// Signing failed.
    #[error(transparent)]
    Signer(#[from] alloy::signers::Error),

    /// Invalid private key or mnemonic.
    #[error(transparent)]
    Wallet(#[from] alloy::signers::local::LocalSignerError),

    /// Malformed signature or failed recovery.
    #[error(transparent)]
    Signature(#[from] alloy::primitives::SignatureError),

    /// Decimal amount could not be converted to base units.
    #[error(transparent)]
    Units(#[from] alloy::primitives::utils::UnitsError),

    /// Malformed hex input (addresses, hashes, calldata).
    #[error(transparent)]
    Hex(#[from] alloy::hex::FromHexError),

    /// Malformed RPC endpoint URL.
    #[error(transparent)]
    Url(#[from] url::ParseError),

    /// Off-chain metadata request failed.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// ABI has no function with this name or signature.
    #[error("Function not found in ABI: {0}")]
    UnknownFunction(String),

    /// ABI has no event with this name.
    #[error("Event not found in ABI: {0}")]
    UnknownEvent(String),

    /// Gas price does not fit the transaction field.
    #[error("Gas price {0} wei exceeds the 128-bit range")]
    GasPriceOverflow(U256),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Address and private key of a wallet, handed to the caller and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletMaterial {
    /// EIP-55 checksummed address.
    pub address: String,
    /// 0x-prefixed 32-byte private key.
    pub private_key: String,
}

/// Gas parameters for a state-changing call, already in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasSettings {
    /// Gas price in wei.
    pub gas_price: u128,
    /// Gas limit.
    pub gas_limit: u64,
}

impl GasSettings {
    /// Convert a decimal gwei string and a gas limit.
    pub fn from_gwei(gas_price_gwei: &str, gas_limit: u64) -> BlockchainResult<Self> {
        let wei = units::parse_gwei(gas_price_gwei)?;
        let gas_price = u128::try_from(wei).map_err(|_| BlockchainError::GasPriceOverflow(wei))?;
        Ok(Self {
            gas_price,
            gas_limit,
        })
    }
}
