//! Shared fakes for integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use alloy::primitives::TxHash;
use async_trait::async_trait;
use dex_glue::blockchain::{BlockchainError, BlockchainResult, PollPolicy, Receipt, ReceiptSource};

/// One scripted reply from the fake node.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Reply {
    Pending,
    Mined { success: bool },
    Error(&'static str),
}

/// Node fake that answers receipt requests from a script.
///
/// Once the script runs out, the last reply repeats.
pub struct ScriptedNode {
    replies: Mutex<VecDeque<Reply>>,
    last: Mutex<Reply>,
    calls: AtomicU32,
}

#[allow(dead_code)]
impl ScriptedNode {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            last: Mutex::new(Reply::Pending),
            calls: AtomicU32::new(0),
        }
    }

    /// `pending` empty replies, then a successful receipt.
    pub fn mined_after(pending: usize) -> Self {
        let mut replies = vec![Reply::Pending; pending];
        replies.push(Reply::Mined { success: true });
        Self::new(replies)
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReceiptSource for ScriptedNode {
    async fn transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<Receipt>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            let mut last = self.last.lock().unwrap();
            if let Some(next) = replies.pop_front() {
                *last = next;
            }
            last.clone()
        };

        match reply {
            Reply::Pending => Ok(None),
            Reply::Mined { success } => Ok(Some(Receipt {
                transaction_hash: tx_hash,
                block_number: Some(19_000_000),
                success,
            })),
            Reply::Error(msg) => Err(BlockchainError::Rpc(msg.to_string())),
        }
    }

    fn label(&self) -> &str {
        "scripted"
    }
}

/// Poll without sleeping and without limits.
#[allow(dead_code)]
pub fn immediate() -> PollPolicy {
    PollPolicy::fixed(Duration::ZERO)
}

pub fn hash(s: &str) -> TxHash {
    let hex = s.trim_start_matches("0x");
    format!("0x{:0>64}", hex).parse().unwrap()
}
