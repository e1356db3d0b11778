// wallet-core/src/chains/evm/mod.rs

//! Ethereum Virtual Machine (EVM) Chain Support
//!
//! # Key Features
//! - **Key Model**: signing key, public key and address as one owned value via [`KeyMaterial`].
//! - **Address Derivation**: Keccak-256 of the uncompressed public key, EIP-55 display via [`EvmAddress`].
//! - **Signing**: legacy transactions with EIP-155 replay protection and a signer self-check via [`EvmSigner`].

pub mod address;
pub mod key;
pub mod signer;

// Re-exports for cleaner API access
pub use address::{keccak256, EvmAddress};
pub use key::KeyMaterial;
pub use signer::{EvmSigner, SignedTransaction, UnsignedTransaction};
