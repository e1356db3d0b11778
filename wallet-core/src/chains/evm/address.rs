// wallet-core/src/chains/evm/address.rs
//
// EVM Address Module - public key → 20-byte account identifier
// EIP-55 (Checksum), Keccak-256, secp256k1

use crate::error::{WalletError, WalletResult};
use alloy::primitives::Address;
use k256::ecdsa::VerifyingKey;
use tiny_keccak::{Hasher, Keccak};
use zeroize::Zeroize;

/// EVM Address Generator
///
/// # Flow:  Private Key (32B) → Public Key (64B) → Keccak256 → Address (20B)
///
/// Module này KHÔNG lưu private key.
pub struct EvmAddress;

impl EvmAddress {
    // =========================================================================
    // CORE: Public Key → Address
    // =========================================================================

    /// Address of an uncompressed public key
    ///
    /// # Algorithm (Ethereum Yellow Paper)
    /// 1. `pub_key` → SEC1 uncompressed (65B)
    /// 2. Drop the 0x04 prefix → 64B
    /// 3. Keccak-256 → 32B
    /// 4. `hash[12..32]` → address (20B)
    pub fn from_public_key(public_key: &VerifyingKey) -> Address {
        let encoded = public_key.to_encoded_point(false);
        Self::from_uncompressed(&encoded.as_bytes()[1..])
    }

    /// Address of a raw 64-byte `X || Y` public key
    pub fn from_uncompressed(pub_key_raw: &[u8]) -> Address {
        let mut hash = keccak256(pub_key_raw);
        let address = Address::from_slice(&hash[12..]);
        hash.zeroize();
        address
    }

    // =========================================================================
    // PARSING
    // =========================================================================

    /// Parse a `0x`-prefixed or bare 40-hex-digit address
    ///
    /// Keystore documents store the bare form, file names the `0x` form.
    pub fn parse(address: &str) -> WalletResult<Address> {
        let trimmed = address.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(digits)
            .map_err(|_| WalletError::Validation(format!("Invalid address: {}", address)))?;
        if bytes.len() != 20 {
            return Err(WalletError::Validation(format!(
                "Invalid address length: {} bytes",
                bytes.len()
            )));
        }
        Ok(Address::from_slice(&bytes))
    }
}

/// Keccak-256 digest
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut out = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut out);
    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;

    const TEST_PRIVATE_KEY: &str =
        "501c797c4b1fdfa88fb7efdf7c9871b8e0f46dbc44259e3e270e0d4c938165f5";
    const TEST_ADDRESS: &str = "0xb611C31e4284BF7A7daD3296e62880F14b3b15DD";

    // Anvil/Hardhat account #0
    const ANVIL_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const ANVIL_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn address_of(priv_hex: &str) -> Address {
        let signing_key = SigningKey::from_slice(&hex::decode(priv_hex).unwrap()).unwrap();
        EvmAddress::from_public_key(signing_key.verifying_key())
    }

    #[test]
    fn test_from_public_key() {
        assert_eq!(address_of(TEST_PRIVATE_KEY).to_checksum(None), TEST_ADDRESS);
        assert_eq!(address_of(ANVIL_PRIVATE_KEY).to_checksum(None), ANVIL_ADDRESS);
    }

    #[test]
    fn test_uncompressed_matches_public_key() {
        let signing_key =
            SigningKey::from_slice(&hex::decode(ANVIL_PRIVATE_KEY).unwrap()).unwrap();
        let encoded = signing_key.verifying_key().to_encoded_point(false);
        assert_eq!(
            EvmAddress::from_uncompressed(&encoded.as_bytes()[1..]),
            address_of(ANVIL_PRIVATE_KEY)
        );
    }

    #[test]
    fn test_keccak_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_parse_prefixed_and_bare() {
        let prefixed = EvmAddress::parse("0xb611c31e4284bf7a7dad3296e62880f14b3b15dd").unwrap();
        let bare = EvmAddress::parse("b611c31e4284bf7a7dad3296e62880f14b3b15dd").unwrap();
        assert_eq!(prefixed, bare);
        assert_eq!(prefixed.to_checksum(None), TEST_ADDRESS);
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(EvmAddress::parse("0xinvalid").is_err());
        assert!(EvmAddress::parse("0x123").is_err());
        assert!(EvmAddress::parse("").is_err());
    }
}
