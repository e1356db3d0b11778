// wallet-core/src/lib.rs
//
// ethwallet-core: mnemonic → HD key → encrypted keystore → EIP-155 signing

pub mod api;
pub mod chains;
pub mod config;
pub mod crypto;
pub mod error;
pub mod keystore;
pub mod network;

pub use api::{CreatedWallet, FixedSecret, SecretSource, TerminalSecret, Wallet, WalletState};
pub use chains::evm::{EvmAddress, EvmSigner, KeyMaterial, SignedTransaction, UnsignedTransaction};
pub use chains::ChainConfig;
pub use config::{ScryptCost, WalletConfig};
pub use crypto::{DerivationPaths, HdPath, KeyDeriver, WalletMnemonic, WordCount};
pub use error::{AuthFailure, CryptoError, KeystoreError, MnemonicError, WalletError, WalletResult};
pub use keystore::{EncryptedKeyFile, Keystore};
pub use network::{Balance, LogEntry, LogFilter, RpcClient, TokenTransfer, TransferLogQuery};
