// wallet-core/src/api/mod.rs
//
// Public API - Wallet Facade (create / load / sign) + secret input boundary

pub mod secret;
pub mod wallet;

pub use secret::{FixedSecret, SecretSource, TerminalSecret};
pub use wallet::{CreatedWallet, Wallet, WalletState};
