// wallet-core/src/chains/evm/signer.rs
//
// EVM Signer Module - Offline transaction signing with signer self-check
// Hỗ trợ: EIP-155 (Replay Protection), legacy transactions, EIP-2718 raw encoding

use super::key::KeyMaterial;
use crate::error::{CryptoError, WalletError, WalletResult};
use alloy::{
    consensus::{SignableTransaction, TxEnvelope, TxLegacy},
    eips::eip2718::Encodable2718,
    primitives::{Address, Bytes, Signature, TxKind, B256, U256},
    signers::{local::LocalSigner, SignerSync},
};

/// A transfer or call that has not been signed yet
///
/// The chain id is not part of this value: it is bound at signing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub nonce: u64,
    pub to: Address,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub data: Bytes,
}

impl UnsignedTransaction {
    /// Legacy transaction bound to `chain_id` (EIP-155)
    pub fn to_legacy(&self, chain_id: u64) -> TxLegacy {
        TxLegacy {
            chain_id: Some(chain_id),
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: TxKind::Call(self.to),
            value: self.value,
            input: self.data.clone(),
        }
    }
}

/// A signed, self-verified transaction ready for `eth_sendRawTransaction`
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    tx: TxLegacy,
    signature: Signature,
    signing_hash: B256,
    hash: B256,
    from: Address,
    raw: Vec<u8>,
}

impl SignedTransaction {
    /// Recovered (and verified) sender
    #[inline]
    pub fn from(&self) -> Address {
        self.from
    }

    /// Transaction hash (keccak256 of the raw bytes)
    #[inline]
    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// EIP-155 digest that was signed
    #[inline]
    pub fn signing_hash(&self) -> B256 {
        self.signing_hash
    }

    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    #[inline]
    pub fn transaction(&self) -> &TxLegacy {
        &self.tx
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.tx.chain_id
    }

    /// EIP-155 `v`: `{0,1} + chain_id * 2 + 35`
    ///
    /// Widened to u128: any u64 chain id fits without overflow.
    pub fn v(&self) -> u128 {
        let parity = u128::from(self.signature.v());
        match self.tx.chain_id {
            Some(chain_id) => parity + u128::from(chain_id) * 2 + 35,
            None => parity + 27,
        }
    }

    /// RLP-encoded raw transaction bytes
    #[inline]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Recover the sender as a node on `chain_id` would
    ///
    /// On any chain other than the one signed for, the digest differs and the
    /// signature recovers to an unrelated address (or fails).
    pub fn recover_on_chain(&self, chain_id: u64) -> WalletResult<Address> {
        let mut tx = self.tx.clone();
        tx.chain_id = Some(chain_id);
        EvmSigner::recover_signer(&tx.signature_hash(), &self.signature)
    }
}

/// EVM Signer - Offline Signing bound to one key and one chain
///
/// # Security Architecture
/// - **Borrowed key**: the signer never owns key material; it lends the
///   caller's [`KeyMaterial`] for the duration of one call
/// - **Replay Protection**: chain id is mandatory (EIP-155)
/// - **Self-check**: every signature is recovered and compared with the
///   account address before it is returned
pub struct EvmSigner<'a> {
    key: &'a KeyMaterial,
    chain_id: u64,
}

impl std::fmt::Debug for EvmSigner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmSigner")
            .field("address", &self.key.address())
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

impl<'a> EvmSigner<'a> {
    // =========================================================================
    // CONSTRUCTOR
    // =========================================================================

    /// # Arguments
    /// * `key` - Account key to sign with
    /// * `chain_id` - Chain ID (1 = Ethereum, 56 = BSC, 137 = Polygon, ...)
    pub fn new(key: &'a KeyMaterial, chain_id: u64) -> Self {
        Self { key, chain_id }
    }

    // =========================================================================
    // GETTERS
    // =========================================================================

    #[inline]
    pub fn address(&self) -> Address {
        self.key.address()
    }

    #[inline]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    // =========================================================================
    // TRANSACTION SIGNING (EIP-155)
    // =========================================================================

    /// Sign for the key's own address
    pub fn sign_transaction(&self, tx: &UnsignedTransaction) -> WalletResult<SignedTransaction> {
        self.sign_transaction_for(self.key.address(), tx)
    }

    /// Sign and verify that the signature recovers to `account`
    ///
    /// Fails with [`CryptoError::SignerMismatch`] (and returns no signature)
    /// if the recovered signer is anything other than `account`.
    pub fn sign_transaction_for(
        &self,
        account: Address,
        tx: &UnsignedTransaction,
    ) -> WalletResult<SignedTransaction> {
        let legacy = tx.to_legacy(self.chain_id);
        let signing_hash = legacy.signature_hash();

        let signature = self.sign_hash_sync(&signing_hash)?;

        let recovered = Self::recover_signer(&signing_hash, &signature)?;
        if recovered != account {
            tracing::warn!(
                expected = %account,
                recovered = %recovered,
                chain_id = self.chain_id,
                "signer self-check failed"
            );
            return Err(WalletError::Crypto(CryptoError::SignerMismatch {
                expected: account.to_checksum(None),
                recovered: recovered.to_checksum(None),
            }));
        }

        let envelope = TxEnvelope::from(legacy.clone().into_signed(signature));
        let raw = envelope.encoded_2718();
        let hash = *envelope.tx_hash();

        tracing::debug!(from = %recovered, chain_id = self.chain_id, tx_hash = %hash, "signed transaction");

        Ok(SignedTransaction {
            tx: legacy,
            signature,
            signing_hash,
            hash,
            from: recovered,
            raw,
        })
    }

    // =========================================================================
    // HASH SIGNING (Low-level)
    // =========================================================================

    /// Sign a 32-byte digest directly (deterministic RFC 6979 nonce)
    pub fn sign_hash_sync(&self, hash: &B256) -> WalletResult<Signature> {
        let signer = LocalSigner::from_signing_key(self.key.signing_key().clone());
        signer
            .sign_hash_sync(hash)
            .map_err(|e| WalletError::Crypto(CryptoError::SigningFailed(e.to_string())))
    }

    // =========================================================================
    // SIGNATURE VERIFICATION
    // =========================================================================

    /// Recover the address that produced `signature` over `hash`
    pub fn recover_signer(hash: &B256, signature: &Signature) -> WalletResult<Address> {
        signature.recover_address_from_prehash(hash).map_err(|e| {
            WalletError::Crypto(CryptoError::SigningFailed(format!(
                "signature recovery failed: {}",
                e
            )))
        })
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================
