// wallet-core/src/network/traits.rs

// RPC Client Boundary
//
// Core không tự nói chuyện với node: mọi network I/O đi qua trait này,
// implement bên ngoài (HTTP/WebSocket client, hoặc mock trong test).

use crate::error::WalletResult;
use crate::network::models::{LogEntry, LogFilter};
use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;

/// RpcClient - the four node calls the wallet consumes
///
/// # Design Principles
/// - **Opaque**: the core hands over fully signed bytes and trusts the result
/// - **Async-First**: every call may suspend on network I/O
/// - **Error Handling**: failures surface as `WalletError::Rpc`
#[async_trait]
pub trait RpcClient: Send + Sync {
    /// `eth_getTransactionCount(address, "pending")`
    async fn get_transaction_count(&self, address: Address) -> WalletResult<u64>;

    /// `eth_sendRawTransaction`; returns the transaction hash
    async fn send_raw_transaction(&self, raw_tx: &[u8]) -> WalletResult<B256>;

    /// `eth_getBalance(address, "latest")` in wei
    async fn get_balance(&self, address: Address) -> WalletResult<U256>;

    /// `eth_getLogs`, filtered by the node
    async fn filter_logs(&self, filter: &LogFilter) -> WalletResult<Vec<LogEntry>>;
}
