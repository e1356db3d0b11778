// wallet-core/src/chains/evm/key.rs
//
// Key Material - signing key + public key + address, owned by exactly one holder

use super::address::EvmAddress;
use crate::error::{CryptoError, WalletError, WalletResult};
use alloy::primitives::Address;
use k256::ecdsa::{SigningKey, VerifyingKey};
use zeroize::Zeroizing;

/// secp256k1 key pair and its account address
///
/// Not `Clone`: whoever holds a `KeyMaterial` owns the only in-memory copy of
/// the private scalar. It moves from the deriver or keystore to the caller and
/// is lent by reference to the signer. `SigningKey` zeroizes itself on drop.
pub struct KeyMaterial {
    signing_key: SigningKey,
    address: Address,
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl KeyMaterial {
    /// Build from a raw 32-byte scalar
    ///
    /// Zero and values ≥ the curve order are rejected.
    pub fn from_slice(priv_key: &[u8]) -> WalletResult<Self> {
        if priv_key.len() != 32 {
            return Err(WalletError::Crypto(CryptoError::InvalidKeyFormat(format!(
                "Invalid private key length: expected 32 bytes, got {}",
                priv_key.len()
            ))));
        }

        let signing_key = SigningKey::from_slice(priv_key).map_err(|e| {
            WalletError::Crypto(CryptoError::InvalidKeyFormat(format!(
                "Invalid secp256k1 private key: {}",
                e
            )))
        })?;

        Ok(Self::from_signing_key(signing_key))
    }

    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = EvmAddress::from_public_key(signing_key.verifying_key());
        Self {
            signing_key,
            address,
        }
    }

    // =========================================================================
    // GETTERS
    // =========================================================================

    #[inline]
    pub fn address(&self) -> Address {
        self.address
    }

    #[inline]
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    #[inline]
    pub fn public_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// `X || Y`, the 64 bytes hashed into the address
    pub fn public_key_uncompressed(&self) -> [u8; 64] {
        let encoded = self.public_key().to_encoded_point(false);
        let mut out = [0u8; 64];
        out.copy_from_slice(&encoded.as_bytes()[1..]);
        out
    }

    /// Copy of the raw scalar, wiped when the returned buffer drops
    pub fn private_key_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_bytes().into())
    }

    /// Same private key (and therefore same address)
    pub fn same_key(&self, other: &KeyMaterial) -> bool {
        self.signing_key == other.signing_key
    }
}
