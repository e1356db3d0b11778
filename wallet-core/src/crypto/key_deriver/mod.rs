// wallet-core/src/crypto/key_deriver/mod.rs
//
// Key Derivation Engine
//
// ┌─────────────────────────────────────────────────┐
// │  Mnemonic + passphrase                          │
// │        │  PBKDF2-HMAC-SHA512 × 2048             │
// │        ▼                                        │
// │  Seed (64 bytes)                                │
// │        │  HMAC-SHA512("Bitcoin seed")           │
// │        ▼                                        │
// │  Master (key, chain code)                       │
// │        │  m/44'/60'/0'/0/1                      │
// │        ▼                                        │
// │  Account signing key → public key → address     │
// └─────────────────────────────────────────────────┘

pub mod secp256k1;

pub use secp256k1::{ExtendedKey, Secp256k1Deriver};

use crate::chains::evm::KeyMaterial;
use crate::crypto::mnemonic::WalletMnemonic;
use crate::crypto::paths::HdPath;
use crate::error::{CryptoError, WalletError, WalletResult};

/// Unified Key Deriver - mnemonic to account key
///
/// Pure and reproducible: the same mnemonic, passphrase and path always give
/// the same [`KeyMaterial`].
pub struct KeyDeriver;

impl KeyDeriver {
    /// Mnemonic + passphrase + path → signing key
    pub fn derive_key(
        mnemonic: &WalletMnemonic,
        passphrase: Option<&str>,
        path: &HdPath,
    ) -> WalletResult<KeyMaterial> {
        let seed = mnemonic.to_seed(passphrase)?;
        Self::derive_from_seed(&seed[..], path)
    }

    /// Seed + path → signing key
    pub fn derive_from_seed(seed: &[u8], path: &HdPath) -> WalletResult<KeyMaterial> {
        Self::validate_seed(seed)?;

        let node = Secp256k1Deriver::derive(seed, path)?;
        let key = KeyMaterial::from_signing_key(node.into_signing_key());

        tracing::debug!(path = %path, address = %key.address(), "derived account key");
        Ok(key)
    }

    /// BIP-32 accepts 128..=512-bit seeds
    #[inline]
    fn validate_seed(seed: &[u8]) -> WalletResult<()> {
        if !(16..=64).contains(&seed.len()) {
            return Err(WalletError::Crypto(CryptoError::DerivationFailed(format!(
                "Invalid seed length: expected 16..=64 bytes, got {}",
                seed.len()
            ))));
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
