//! Node connection, signer, and transaction-confirmation glue for DEX examples.

pub mod blockchain;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod tokens;

pub use blockchain::{ConfirmationTracker, Environment, ProviderSet, TransactionState};
pub use config::AppConfig;
pub use lifecycle::Shutdown;
