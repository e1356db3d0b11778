// wallet-core/src/chains/mod.rs
pub mod evm;

use serde::{Deserialize, Serialize};

/// Chain ID mà ví ký mặc định (private network)
pub const DEFAULT_CHAIN_ID: u64 = 1_234_567;
/// Gas limit cho native transfer
pub const DEFAULT_GAS_LIMIT: u64 = 210_000;
/// 5 gwei
pub const DEFAULT_GAS_PRICE: u128 = 5_000_000_000;

// Cấu hình chain mà ví ký giao dịch cho
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: String,
    pub gas_limit: u64,
    pub gas_price: u128,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            name: "Private Network".to_string(),
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price: DEFAULT_GAS_PRICE,
        }
    }
}
