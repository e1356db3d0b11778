// wallet-core/src/network/models.rs
//
// Data Models for the RPC boundary
//
// Tất cả structs đều:
// - Serialize/Deserialize friendly (JSON)
// - Dùng alloy primitives (Address, B256, U256) thay vì string

use crate::chains::evm::keccak256;
use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

// =============================================================================
// BALANCE
// =============================================================================

/// Số dư tài sản
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// Số dư raw (string để tránh overflow với số lớn)
    pub raw: String,
    /// Số dư đã format với decimals (e.g., "1.5")
    pub formatted: String,
    /// Symbol (e.g., "ETH")
    pub symbol: String,
    /// Số decimals
    pub decimals: u8,
}

impl Balance {
    /// Native balance in wei (18 decimals)
    pub fn from_wei(wei: U256, symbol: impl Into<String>) -> Self {
        Self::new(wei.to_string(), 18, symbol)
    }

    /// Tạo Balance từ raw value và decimals
    pub fn new(raw: impl Into<String>, decimals: u8, symbol: impl Into<String>) -> Self {
        let raw_str = raw.into();
        let formatted = Self::format_balance(&raw_str, decimals);
        Self {
            raw: raw_str,
            formatted,
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Format raw balance thành human-readable string
    fn format_balance(raw: &str, decimals: u8) -> String {
        if decimals == 0 || raw == "0" {
            return raw.to_string();
        }

        let raw_len = raw.len();
        let decimals_usize = decimals as usize;

        if raw_len <= decimals_usize {
            // Số nhỏ hơn 1 (e.g., 0.001)
            let padding = decimals_usize - raw_len;
            let decimal_part = format!("{}{}", "0".repeat(padding), raw);
            let trimmed = decimal_part.trim_end_matches('0');
            if trimmed.is_empty() {
                "0".to_string()
            } else {
                format!("0.{}", trimmed)
            }
        } else {
            // Số >= 1
            let integer_part = &raw[..raw_len - decimals_usize];
            let decimal_part = &raw[raw_len - decimals_usize..];
            let trimmed_decimal = decimal_part.trim_end_matches('0');
            if trimmed_decimal.is_empty() {
                integer_part.to_string()
            } else {
                format!("{}.{}", integer_part, trimmed_decimal)
            }
        }
    }
}

// =============================================================================
// LOGS
// =============================================================================

/// `eth_getLogs` query
///
/// `topics[i] == None` is a wildcard for position `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    pub address: Option<Address>,
    pub topics: Vec<Option<B256>>,
    pub from_block: Option<u64>,
    pub to_block: Option<u64>,
}

impl LogFilter {
    /// Whether `log` satisfies this filter (the node-side semantics)
    pub fn matches(&self, log: &LogEntry) -> bool {
        if let Some(address) = self.address {
            if log.address != address {
                return false;
            }
        }
        if let Some(block) = log.block_number {
            if self.from_block.is_some_and(|from| block < from)
                || self.to_block.is_some_and(|to| block > to)
            {
                return false;
            }
        }
        self.topics.iter().enumerate().all(|(i, topic)| match topic {
            None => true,
            Some(wanted) => log.topics.get(i) == Some(wanted),
        })
    }
}

/// Event log as returned by the node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<B256>,
    pub log_index: Option<u64>,
}

// =============================================================================
// ERC-20 TRANSFER HISTORY
// =============================================================================

pub const TRANSFER_EVENT_SIGNATURE: &str = "Transfer(address,address,uint256)";

/// topic0 of the ERC-20 `Transfer` event
pub fn transfer_topic() -> B256 {
    B256::from(keccak256(TRANSFER_EVENT_SIGNATURE.as_bytes()))
}

/// Transfers of one token that involve one account
///
/// Restricted at the query itself: contract address, event topic and the
/// account in the indexed sender or recipient slot. No unfiltered log scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferLogQuery {
    pub token: Address,
    pub account: Address,
    pub from_block: Option<u64>,
    pub to_block: Option<u64>,
}

impl TransferLogQuery {
    pub fn for_account(token: Address, account: Address) -> Self {
        Self {
            token,
            account,
            from_block: None,
            to_block: None,
        }
    }

    pub fn with_block_range(mut self, from_block: Option<u64>, to_block: Option<u64>) -> Self {
        self.from_block = from_block;
        self.to_block = to_block;
        self
    }

    /// Sent by the account
    pub fn outgoing_filter(&self) -> LogFilter {
        self.filter(vec![Some(transfer_topic()), Some(self.account.into_word())])
    }

    /// Received by the account
    pub fn incoming_filter(&self) -> LogFilter {
        self.filter(vec![
            Some(transfer_topic()),
            None,
            Some(self.account.into_word()),
        ])
    }

    fn filter(&self, topics: Vec<Option<B256>>) -> LogFilter {
        LogFilter {
            address: Some(self.token),
            topics,
            from_block: self.from_block,
            to_block: self.to_block,
        }
    }

    /// Decode logs, keep those involving the account, drop duplicates
    /// (a self-transfer matches both filters), order by block and log index
    pub fn collect(&self, logs: impl IntoIterator<Item = LogEntry>) -> Vec<TokenTransfer> {
        let mut transfers: Vec<TokenTransfer> = Vec::new();
        for log in logs {
            if log.address != self.token {
                continue;
            }
            if let Some(transfer) = TokenTransfer::from_log(&log) {
                if transfer.involves(self.account) && !transfers.contains(&transfer) {
                    transfers.push(transfer);
                }
            }
        }
        transfers.sort_by_key(|t| (t.block_number, t.log_index));
        transfers
    }
}

/// Decoded ERC-20 `Transfer(from, to, value)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<B256>,
    pub log_index: Option<u64>,
}

impl TokenTransfer {
    /// `None` unless the log has the Transfer topic, two indexed addresses and
    /// a 32-byte value
    pub fn from_log(log: &LogEntry) -> Option<Self> {
        if log.topics.len() != 3 || log.topics[0] != transfer_topic() || log.data.len() != 32 {
            return None;
        }
        Some(Self {
            token: log.address,
            from: Address::from_word(log.topics[1]),
            to: Address::from_word(log.topics[2]),
            value: U256::from_be_slice(&log.data),
            block_number: log.block_number,
            transaction_hash: log.transaction_hash,
            log_index: log.log_index,
        })
    }

    pub fn involves(&self, account: Address) -> bool {
        self.from == account || self.to == account
    }
}

// =============================================================================
// TESTS
// =============================================================================
