//! Transaction state and confirmation tracking.
//!
//! # Responsibilities
//! - Model the submission lifecycle (`TransactionState`)
//! - Poll a `ReceiptSource` until the transaction is mined
//! - Bound the wait by attempts, deadline, and a shutdown signal
//!
//! Every failure is folded into `TransactionState::Failed`; the tracker
//! itself never returns an error.

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::sleep;

use crate::blockchain::receipt::ReceiptSource;
use crate::config::TrackerConfig;
use crate::observability::metrics;
use crate::resilience::backoff::poll_delay;

/// Outcome of a transaction submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum TransactionState {
    Failed,
    New,
    Rejected,
    Sending,
    Sent,
}

impl TransactionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionState::Failed => "Failed",
            TransactionState::New => "New",
            TransactionState::Rejected => "Rejected",
            TransactionState::Sending => "Sending",
            TransactionState::Sent => "Sent",
        }
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How long and how often to ask for a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay before the second poll; later delays double from here.
    pub initial_delay: Duration,
    /// Upper bound on the delay between polls.
    pub max_delay: Duration,
    /// Give up after this many polls. `None` polls until mined.
    pub max_attempts: Option<u32>,
    /// Give up once this much time has passed. `None` waits forever.
    pub deadline: Option<Duration>,
}

impl PollPolicy {
    /// Poll every `interval`, without attempt or time limits.
    pub fn fixed(interval: Duration) -> Self {
        Self {
            initial_delay: interval,
            max_delay: interval,
            max_attempts: None,
            deadline: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Neither an attempt cap nor a deadline is set.
    pub fn is_unbounded(&self) -> bool {
        self.max_attempts.is_none() && self.deadline.is_none()
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollPolicy::from(&TrackerConfig::default())
    }
}

impl From<&TrackerConfig> for PollPolicy {
    fn from(config: &TrackerConfig) -> Self {
        Self {
            initial_delay: Duration::from_millis(config.poll_interval_ms),
            max_delay: Duration::from_millis(config.max_poll_interval_ms),
            max_attempts: config.max_attempts,
            deadline: config.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Waits for submitted transactions to be mined.
///
/// Holds no per-transaction state, so one tracker can serve any number of
/// concurrent waits.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationTracker {
    policy: PollPolicy,
}

impl ConfirmationTracker {
    pub fn new(policy: PollPolicy) -> Self {
        if policy.is_unbounded() {
            tracing::warn!("Receipt polling has no attempt limit or deadline");
        }
        Self { policy }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Wait until `tx_hash` has a receipt.
    ///
    /// Returns `Sent` once any receipt is returned, `Failed` otherwise.
    pub async fn await_confirmation(
        &self,
        tx_hash: TxHash,
        connection: Option<&dyn ReceiptSource>,
    ) -> TransactionState {
        self.await_confirmation_until(tx_hash, connection, None).await
    }

    /// Like [`await_confirmation`](Self::await_confirmation), but returns
    /// `Failed` as soon as `shutdown` fires.
    pub async fn await_confirmation_until(
        &self,
        tx_hash: TxHash,
        connection: Option<&dyn ReceiptSource>,
        shutdown: Option<&mut broadcast::Receiver<()>>,
    ) -> TransactionState {
        let Some(connection) = connection else {
            tracing::warn!(tx_hash = %tx_hash, "No connection available, cannot track transaction");
            metrics::record_confirmation_outcome(TransactionState::Failed);
            return TransactionState::Failed;
        };

        let deadline = async {
            match self.policy.deadline {
                Some(limit) => sleep(limit).await,
                None => std::future::pending().await,
            }
        };

        let state = tokio::select! {
            state = self.poll_until_mined(tx_hash, connection) => state,
            _ = deadline => {
                tracing::warn!(
                    tx_hash = %tx_hash,
                    timeout_secs = self.policy.deadline.map(|d| d.as_secs()).unwrap_or_default(),
                    "Gave up waiting for receipt"
                );
                TransactionState::Failed
            }
            _ = cancelled(shutdown) => {
                tracing::info!(tx_hash = %tx_hash, "Confirmation wait cancelled");
                TransactionState::Failed
            }
        };

        metrics::record_confirmation_outcome(state);
        state
    }

    async fn poll_until_mined(&self, tx_hash: TxHash, connection: &dyn ReceiptSource) -> TransactionState {
        let mut attempt: u32 = 0;

        loop {
            if let Some(max_attempts) = self.policy.max_attempts {
                if attempt >= max_attempts {
                    tracing::warn!(
                        tx_hash = %tx_hash,
                        attempts = attempt,
                        "Receipt not available after maximum attempts"
                    );
                    return TransactionState::Failed;
                }
            }

            let delay = poll_delay(attempt, self.policy.initial_delay, self.policy.max_delay);
            if delay.is_zero() {
                // Let the deadline and shutdown branches run between polls.
                tokio::task::yield_now().await;
            } else {
                sleep(delay).await;
            }

            metrics::record_receipt_poll(connection.label());
            match connection.transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    if !receipt.success {
                        tracing::warn!(tx_hash = %tx_hash, "Transaction mined with reverted status");
                    }
                    tracing::info!(
                        tx_hash = %tx_hash,
                        block_number = receipt.block_number.unwrap_or_default(),
                        attempts = attempt + 1,
                        "Transaction mined"
                    );
                    return TransactionState::Sent;
                }
                Ok(None) => {
                    tracing::debug!(tx_hash = %tx_hash, attempt = attempt + 1, "Transaction pending");
                    attempt = attempt.saturating_add(1);
                }
                Err(e) => {
                    tracing::error!(
                        tx_hash = %tx_hash,
                        endpoint = %connection.label(),
                        error = %e,
                        "Receipt error"
                    );
                    return TransactionState::Failed;
                }
            }
        }
    }
}

/// Resolves when `shutdown` fires. Never resolves without a receiver, or
/// once every sender is gone.
async fn cancelled(shutdown: Option<&mut broadcast::Receiver<()>>) {
    let Some(rx) = shutdown else {
        return std::future::pending().await;
    };
    match rx.recv().await {
        Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {}
        Err(broadcast::error::RecvError::Closed) => std::future::pending().await,
    }
}
