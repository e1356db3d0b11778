// wallet-core/src/crypto/key_deriver/secp256k1.rs
//
// secp256k1 Key Derivation - BIP-32
//
// Algorithm: HMAC-SHA512 hierarchical deterministic derivation
// Reference: https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki
//
// Child không hợp lệ (IL >= n hoặc key = 0) là lỗi cứng: không bao giờ tự nhảy sang index kế tiếp.

use crate::crypto::paths::{ChildIndex, HdPath};
use crate::error::{CryptoError, WalletError, WalletResult};
use bip32::{ChildNumber, XPrv};
use k256::ecdsa::SigningKey;
use zeroize::Zeroizing;

/// Extended private key: scalar + chain code
pub struct ExtendedKey {
    xprv: XPrv,
}

impl ExtendedKey {
    #[inline]
    pub fn signing_key(&self) -> &SigningKey {
        self.xprv.private_key()
    }

    pub fn chain_code(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.xprv.attrs().chain_code)
    }

    pub fn private_key_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.xprv.private_key().to_bytes().into())
    }

    pub fn into_signing_key(self) -> SigningKey {
        self.xprv.private_key().clone()
    }
}

/// secp256k1 Key Deriver - BIP-32 Standard
///
/// # Security
/// - Intermediate keys và chain codes zeroize khi drop
/// - An invalid child at any step is a hard error; the next index is never tried
pub struct Secp256k1Deriver;

impl Secp256k1Deriver {
    /// Walk `path` from the master key of `seed`
    pub fn derive(seed: &[u8], path: &HdPath) -> WalletResult<ExtendedKey> {
        let mut node = Self::master_key(seed)?;
        for (depth, step) in path.steps().iter().enumerate() {
            node = Self::child_key(&node, *step).map_err(|e| match e {
                WalletError::Crypto(CryptoError::DerivationFailed(msg)) => {
                    WalletError::Crypto(CryptoError::DerivationFailed(format!(
                        "depth {} of {}: {}",
                        depth + 1,
                        path,
                        msg
                    )))
                }
                other => other,
            })?;
        }
        Ok(node)
    }

    /// Master key: HMAC-SHA512(Key = "Bitcoin seed", Data = seed)
    pub fn master_key(seed: &[u8]) -> WalletResult<ExtendedKey> {
        let xprv = XPrv::new(seed).map_err(|e| {
            WalletError::Crypto(CryptoError::DerivationFailed(format!(
                "Failed to create master key: {}",
                e
            )))
        })?;
        Ok(ExtendedKey { xprv })
    }

    /// Private parent → private child
    pub fn child_key(parent: &ExtendedKey, child: ChildIndex) -> WalletResult<ExtendedKey> {
        let xprv = parent
            .xprv
            .derive_child(ChildNumber::from(child))
            .map_err(|e| {
                WalletError::Crypto(CryptoError::DerivationFailed(format!(
                    "child {} invalid: {}",
                    child.to_bits(),
                    e
                )))
            })?;
        Ok(ExtendedKey { xprv })
    }
}

// =============================================================================
// TESTS
// =============================================================================
