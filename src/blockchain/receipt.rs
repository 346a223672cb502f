//! Receipt lookups.
//!
//! `ReceiptSource` is the only capability the confirmation tracker needs from
//! a node connection. `NodeClient` implements it against JSON-RPC; tests
//! substitute scripted fakes.

use alloy::primitives::TxHash;
use alloy::rpc::types::TransactionReceipt;
use async_trait::async_trait;
use serde::Serialize;

use crate::blockchain::types::BlockchainResult;

/// A mined transaction as reported by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    /// Execution status flag (`status == 1`).
    pub success: bool,
}

impl From<&TransactionReceipt> for Receipt {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            success: receipt.status(),
        }
    }
}

impl From<TransactionReceipt> for Receipt {
    fn from(receipt: TransactionReceipt) -> Self {
        Self::from(&receipt)
    }
}

/// Read-only access to transaction receipts.
#[async_trait]
pub trait ReceiptSource: Send + Sync {
    /// Fetch the receipt for `tx_hash`.
    ///
    /// `Ok(None)` means the transaction is not mined yet. Any `Err` is a
    /// transient fetch failure.
    async fn transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<Receipt>>;

    /// Short label used in log fields.
    fn label(&self) -> &str {
        "node"
    }
}
