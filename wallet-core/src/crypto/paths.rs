// wallet-core/src/crypto/paths.rs
//
// Derivation Paths Module - BIP-44 paths for the EVM account
// BIP-32 (tree), BIP-44 (purpose/coin/account/change/index), SLIP-44 (coin types)

use crate::error::{CryptoError, WalletError, WalletResult};
use bip32::{ChildNumber, DerivationPath};
use std::fmt;
use std::str::FromStr;

/// SLIP-44 Registered Coin Types
/// Ref: https://github.com/satoshilabs/slips/blob/master/slip-0044.md
pub mod coin_type {
    pub const ETHEREUM: u32 = 60; // EVM chains dùng chung coin_type 60
}

/// Bit set on hardened child indices
pub const HARDENED_BIT: u32 = 0x8000_0000;

// =============================================================================
// DERIVATION PATHS
// =============================================================================
/// Pre-built derivation paths
///
/// # Conventions
/// - BIP-44: `m/44'/coin'/account'/change/index`
/// - The wallet signs with a single path, [`DerivationPaths::WALLET_DEFAULT`].
pub struct DerivationPaths;

impl DerivationPaths {
    /// Path compiled into the wallet: account 0, external chain, index 1
    pub const WALLET_DEFAULT: &'static str = "m/44'/60'/0'/0/1";

    /// First EVM address, the one most other wallets show by default
    pub const EVM_0: &'static str = "m/44'/60'/0'/0/0";

    /// EVM path with custom address index
    #[inline]
    pub fn evm(index: u32) -> String {
        format!("m/44'/60'/0'/0/{}", index)
    }

    /// EVM path with custom account & index
    #[inline]
    pub fn evm_account(account: u32, index: u32) -> String {
        format!("m/44'/60'/{}'/0/{}", account, index)
    }

    /// Custom BIP-44 path
    ///
    /// # Arguments
    /// * `purpose` - 44 (BIP-44)
    /// * `coin_type` - SLIP-44 coin type (see [`coin_type`])
    /// * `account` - Account index (hardened)
    /// * `change` - 0 = external, 1 = internal
    /// * `index` - Address index
    #[inline]
    pub fn bip44(purpose: u32, coin_type: u32, account: u32, change: u32, index: u32) -> String {
        format!(
            "m/{}'/{}'/{}'/{}/{}",
            purpose, coin_type, account, change, index
        )
    }
}

// =============================================================================
// PARSED PATH
// =============================================================================

/// One step of a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildIndex {
    pub index: u32,
    pub hardened: bool,
}

impl ChildIndex {
    /// Serialized child number (`index | 0x80000000` when hardened)
    #[inline]
    pub fn to_bits(self) -> u32 {
        if self.hardened {
            self.index | HARDENED_BIT
        } else {
            self.index
        }
    }
}

impl From<ChildNumber> for ChildIndex {
    fn from(child: ChildNumber) -> Self {
        Self {
            index: child.index(),
            hardened: child.is_hardened(),
        }
    }
}

impl From<ChildIndex> for ChildNumber {
    fn from(child: ChildIndex) -> Self {
        ChildNumber::from(child.to_bits())
    }
}

/// A validated `m/...` path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HdPath {
    steps: Vec<ChildIndex>,
}

impl HdPath {
    #[inline]
    pub fn steps(&self) -> &[ChildIndex] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FromStr for HdPath {
    type Err = WalletError;

    fn from_str(path: &str) -> WalletResult<Self> {
        let parsed = DerivationPath::from_str(path.trim()).map_err(|e| {
            WalletError::Crypto(CryptoError::DerivationFailed(format!(
                "Invalid path '{}': {}",
                path, e
            )))
        })?;

        Ok(Self {
            steps: parsed.into_iter().map(ChildIndex::from).collect(),
        })
    }
}

impl fmt::Display for HdPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for step in &self.steps {
            if step.hardened {
                write!(f, "/{}'", step.index)?;
            } else {
                write!(f, "/{}", step.index)?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
