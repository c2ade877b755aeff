//! Wallet generation, import and message signing.
//!
//! # Security
//! - Keys are handed back to the caller and never persisted here
//! - Keys are never logged or serialized by this module
//! - Everything in this module is local: no RPC access

use alloy::hex;
use alloy::primitives::{Address, Signature};
use alloy::signers::local::coins_bip39::{English, Mnemonic};
use alloy::signers::local::{MnemonicBuilder, PrivateKeySigner};
use alloy::signers::SignerSync;

use crate::blockchain::types::{BlockchainResult, WalletMaterial};

/// BIP-44 path of the first Ethereum account.
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

/// Local signing key.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from fresh secure randomness.
    pub fn random() -> Self {
        Self {
            signer: PrivateKeySigner::random(),
        }
    }

    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);
        let signer: PrivateKeySigner = key_hex.parse()?;

        tracing::debug!(address = %signer.address(), "Wallet imported");

        Ok(Self { signer })
    }

    /// Derive the first account of an English BIP-39 mnemonic.
    pub fn from_mnemonic(phrase: &str) -> BlockchainResult<Self> {
        let signer = MnemonicBuilder::<English>::default()
            .phrase(phrase.trim())
            .derivation_path(DEFAULT_DERIVATION_PATH)?
            .build()?;

        tracing::debug!(address = %signer.address(), "Wallet derived from mnemonic");

        Ok(Self { signer })
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Borrow the underlying signer, e.g. to bind it to a provider.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Export address and private key.
    pub fn material(&self) -> WalletMaterial {
        WalletMaterial {
            address: self.address().to_checksum(None),
            private_key: hex::encode_prefixed(self.signer.to_bytes()),
        }
    }

    /// Sign arbitrary message bytes (with Ethereum prefix).
    pub fn sign_message(&self, message: &[u8]) -> BlockchainResult<Signature> {
        Ok(self.signer.sign_message_sync(message)?)
    }
}

impl From<Wallet> for PrivateKeySigner {
    fn from(wallet: Wallet) -> Self {
        wallet.signer
    }
}

/// Generate a random wallet.
pub fn generate_random_wallet() -> WalletMaterial {
    Wallet::random().material()
}

/// Derive a wallet from a mnemonic seed phrase.
pub fn generate_wallet_from_seed(seed: &str) -> BlockchainResult<WalletMaterial> {
    Ok(Wallet::from_mnemonic(seed)?.material())
}

/// Import a wallet from a raw private key.
pub fn import_wallet_from_private_key(private_key: &str) -> BlockchainResult<WalletMaterial> {
    Ok(Wallet::from_private_key(private_key)?.material())
}

/// Generate a 12-word English mnemonic from 128 bits of secure randomness.
pub fn generate_mnemonic() -> String {
    Mnemonic::<English>::new(&mut rand::thread_rng()).to_phrase()
}

/// Check whether a string is a well-formed `0x` address.
///
/// Single-case hex is accepted as-is; mixed case must match the EIP-55 checksum.
pub fn is_valid_address(address: &str) -> bool {
    let Some(digits) = address.strip_prefix("0x") else {
        return false;
    };
    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }

    Address::parse_checksummed(address, None).is_ok()
}

/// Sign a message with a private key, returning the 65-byte signature as hex.
pub fn sign_message(private_key: &str, message: &str) -> BlockchainResult<String> {
    let signature = Wallet::from_private_key(private_key)?.sign_message(message.as_bytes())?;
    Ok(hex::encode_prefixed(signature.as_bytes()))
}

/// Recover the checksummed address that signed `message`.
pub fn verify_signed_message(message: &str, signature: &str) -> BlockchainResult<String> {
    let signature: Signature = signature.parse()?;
    let signer = signature.recover_address_from_msg(message.as_bytes())?;
    Ok(signer.to_checksum(None))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

    #[test]
    fn test_wallet_from_private_key() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(wallet.address().to_checksum(None), TEST_ADDRESS);
    }

    #[test]
    fn test_wallet_with_0x_prefix() {
        let material = import_wallet_from_private_key(&format!("0x{TEST_PRIVATE_KEY}")).unwrap();
        assert_eq!(material.address, TEST_ADDRESS);
        assert_eq!(material.private_key, format!("0x{TEST_PRIVATE_KEY}"));
    }

    #[test]
    fn test_invalid_private_key() {
        let result = Wallet::from_private_key("invalid_key");
        assert!(result.is_err());
    }

    #[test]
    fn test_known_mnemonic() {
        let material = generate_wallet_from_seed(TEST_MNEMONIC).unwrap();
        assert_eq!(material.address, TEST_ADDRESS);
        assert_eq!(material.private_key, format!("0x{TEST_PRIVATE_KEY}"));
    }

    #[test]
    fn test_generated_mnemonic_round_trip() {
        let phrase = generate_mnemonic();
        assert_eq!(phrase.split_whitespace().count(), 12);

        let first = generate_wallet_from_seed(&phrase).unwrap();
        let second = generate_wallet_from_seed(&phrase).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_mnemonic() {
        assert!(generate_wallet_from_seed("not a real mnemonic phrase").is_err());
    }

    #[test]
    fn test_random_wallet_is_importable() {
        let material = generate_random_wallet();
        assert!(is_valid_address(&material.address));
        assert_eq!(material.private_key.len(), 66);

        let imported = import_wallet_from_private_key(&material.private_key).unwrap();
        assert_eq!(imported, material);
    }

    #[test]
    fn test_is_valid_address() {
        assert!(is_valid_address(TEST_ADDRESS));
        assert!(is_valid_address(&TEST_ADDRESS.to_lowercase()));
        assert!(is_valid_address("0x0000000000000000000000000000000000000000"));

        // bad checksum casing
        assert!(!is_valid_address("0xF39fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        // wrong length
        assert!(!is_valid_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb9226"));
        // non-hex
        assert!(!is_valid_address("0xg39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        // missing prefix
        assert!(!is_valid_address("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
    }

    #[test]
    fn test_sign_and_verify_message() {
        let signature = sign_message(TEST_PRIVATE_KEY, "Hello, World!").unwrap();
        // 0x + 65 bytes (r, s, v)
        assert_eq!(signature.len(), 2 + 130);

        let recovered = verify_signed_message("Hello, World!", &signature).unwrap();
        assert_eq!(recovered, TEST_ADDRESS);
    }

    #[test]
    fn test_verify_with_other_message() {
        let signature = sign_message(TEST_PRIVATE_KEY, "original").unwrap();
        let recovered = verify_signed_message("tampered", &signature).unwrap();
        assert_ne!(recovered, TEST_ADDRESS);
    }

    #[test]
    fn test_verify_rejects_malformed_signature() {
        assert!(verify_signed_message("msg", "0x1234").is_err());
    }
}
