//! Node connections, signers, and confirmation tracking.
//!
//! # Data Flow
//! ```text
//! AppConfig (env, rpc, wallet)
//!     → providers.rs (one client per endpoint, signer per environment)
//!     → client.rs (RPC calls with timeouts)
//!     → transaction.rs (broadcast result → poll receipts → TransactionState)
//! ```
//!
//! # Security Constraints
//! - Never log private keys
//! - All RPC calls have configurable timeouts
//! - A missing wallet extension degrades to "no provider", not an error

pub mod client;
pub mod environment;
pub mod providers;
pub mod receipt;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::NodeClient;
pub use environment::Environment;
pub use providers::{ProviderSet, SignerHandle};
pub use receipt::{Receipt, ReceiptSource};
pub use transaction::{ConfirmationTracker, PollPolicy, TransactionState};
pub use types::{BlockchainError, BlockchainResult, ChainId};
pub use wallet::Wallet;
