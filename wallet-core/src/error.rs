// wallet-core/src/error.rs

use thiserror::Error;

pub type WalletResult<T> = std::result::Result<T, WalletError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("Mnemonic Error: {0}")]
    Mnemonic(#[from] MnemonicError),

    #[error("Cryptography Error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Keystore Error: {0}")]
    Keystore(#[from] KeystoreError),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("RPC Error: {0}")]
    Rpc(String),

    #[error("Wallet is locked: unlock it with the keystore password before signing")]
    Locked,
}

impl WalletError {
    /// True for wrong-password / tampered-file failures, where a caller may re-prompt.
    pub fn is_authentication(&self) -> bool {
        matches!(self, WalletError::Keystore(KeystoreError::Authentication(_)))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MnemonicError {
    #[error("System randomness unavailable: {0}")]
    Entropy(String),

    #[error("Invalid entropy length: {0} bits. Expected a multiple of 32 between 128 and 256.")]
    InvalidEntropyLength(usize),

    #[error("Invalid word count: {0}. Expected 12, 15, 18, 21 or 24 words.")]
    InvalidWordCount(usize),

    #[error("Word '{0}' not found in the BIP39 wordlist.")]
    UnknownWord(String),

    #[error("Checksum validation failed.")]
    ChecksumFailed,

    #[error("BIP39 internal error: {0}")]
    Bip39Error(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Signer verification failed: signature recovers to {recovered}, expected {expected}")]
    SignerMismatch { expected: String, recovered: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeystoreError {
    #[error("Keystore not found: {path}")]
    NotFound { path: String },

    #[error("Keystore I/O failed: {0}")]
    Io(String),

    #[error("Malformed keystore: {0}")]
    Format(String),

    #[error("Unsupported keystore parameter: {0}")]
    Unsupported(String),

    #[error("Keystore authentication failed: {0}")]
    Authentication(AuthFailure),
}

/// Which verification step rejected a keystore.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("integrity check failed (MAC mismatch), most likely a wrong password")]
    MacMismatch,

    #[error("address check failed: key belongs to {found}, expected {expected}")]
    AddressMismatch { expected: String, found: String },
}
