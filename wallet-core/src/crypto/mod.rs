// wallet-core/src/crypto/mod.rs

//! Core Cryptography Module
//!
//! - **Mnemonic Generation**: BIP-39 phrases (128-bit entropy by default) via [`WalletMnemonic`].
//! - **Key Derivation**: BIP-32 secp256k1 derivation from mnemonic to account key via [`KeyDeriver`].
//! - **Derivation Paths**: BIP-44 path constants and parsing via [`DerivationPaths`] / [`HdPath`].

pub mod key_deriver;
pub mod mnemonic;
pub mod paths;

pub use key_deriver::{ExtendedKey, KeyDeriver, Secp256k1Deriver};
pub use mnemonic::{WalletMnemonic, WordCount};
pub use paths::{ChildIndex, DerivationPaths, HdPath};
