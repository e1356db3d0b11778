// wallet-core/src/network/mod.rs
//
// Network Module - RPC boundary
//
// Cung cấp:
// - Trait định nghĩa các call mà ví cần từ node
// - Models cho balance, log filter và ERC-20 transfer history

pub mod models;
pub mod traits;

// Re-export cho convenience
pub use models::*;
pub use traits::*;
