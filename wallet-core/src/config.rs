// wallet-core/src/config.rs
//
// Wallet Configuration - the small surface that isolates the compiled-in
// derivation path, chain and KDF cost from the derivation/signing logic.

use crate::chains::ChainConfig;
use crate::crypto::paths::{DerivationPaths, HdPath};
use crate::error::{WalletError, WalletResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// scrypt cost preset used when *writing* keystores
///
/// Reading always honours the parameters recorded in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScryptCost {
    /// N = 2^18, r = 8, p = 1
    #[default]
    Standard,
    /// N = 2^12, r = 8, p = 6
    Light,
}

impl ScryptCost {
    pub const DKLEN: usize = 32;

    /// log2(N)
    pub fn log_n(self) -> u8 {
        match self {
            ScryptCost::Standard => 18,
            ScryptCost::Light => 12,
        }
    }

    pub fn n(self) -> u32 {
        1u32 << self.log_n()
    }

    pub fn r(self) -> u32 {
        8
    }

    pub fn p(self) -> u32 {
        match self {
            ScryptCost::Standard => 1,
            ScryptCost::Light => 6,
        }
    }
}

/// Cấu hình ví: thư mục keystore, derivation path, chain, scrypt preset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    pub data_dir: PathBuf,
    pub derivation_path: String,
    pub chain: ChainConfig,
    pub scrypt: ScryptCost,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./keystore"),
            derivation_path: DerivationPaths::WALLET_DEFAULT.to_string(),
            chain: ChainConfig::default(),
            scrypt: ScryptCost::Standard,
        }
    }
}

impl WalletConfig {
    /// Default config rooted at `data_dir`
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Load a JSON config; absent fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> WalletResult<Self> {
        let path = path.as_ref();
        // Config lỗi không phải lỗi keystore
        let content = std::fs::read_to_string(path).map_err(|e| {
            WalletError::Validation(format!("Cannot read config {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| WalletError::Validation(format!("Invalid config: {}", e)))?;
        config.hd_path()?;
        Ok(config)
    }

    /// Parsed derivation path
    pub fn hd_path(&self) -> WalletResult<HdPath> {
        self.derivation_path.parse()
    }
}
