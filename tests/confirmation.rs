//! Confirmation tracker behavior against scripted nodes.

use std::sync::Arc;
use std::time::Duration;

use dex_glue::blockchain::{ConfirmationTracker, PollPolicy, ReceiptSource, TransactionState};
use dex_glue::lifecycle::Shutdown;

mod common;

use common::{hash, immediate, Reply, ScriptedNode};

#[tokio::test]
async fn test_pending_twice_then_mined() {
    let node = ScriptedNode::new([Reply::Pending, Reply::Pending, Reply::Mined { success: true }]);
    let tracker = ConfirmationTracker::new(immediate());

    let state = tracker.await_confirmation(hash("0xabc"), Some(&node)).await;

    assert_eq!(state, TransactionState::Sent);
    assert_eq!(node.calls(), 3);
}

#[tokio::test]
async fn test_network_error_on_first_call() {
    let node = ScriptedNode::new([Reply::Error("NetworkError")]);
    let tracker = ConfirmationTracker::new(immediate());

    let state = tracker.await_confirmation(hash("0xdef"), Some(&node)).await;

    assert_eq!(state, TransactionState::Failed);
    assert_eq!(node.calls(), 1);
}

#[tokio::test]
async fn test_n_pending_replies_cost_n_plus_one_calls() {
    for pending in [0usize, 1, 5, 17] {
        let node = ScriptedNode::mined_after(pending);
        let state = ConfirmationTracker::new(immediate())
            .await_confirmation(hash("0x1"), Some(&node))
            .await;
        assert_eq!(state, TransactionState::Sent);
        assert_eq!(node.calls(), pending as u32 + 1);
    }
}

#[tokio::test]
async fn test_absent_connection_never_fetches() {
    let node = ScriptedNode::mined_after(0);
    let tracker = ConfirmationTracker::new(immediate());

    let unused: Option<&dyn ReceiptSource> = None;
    let state = tracker.await_confirmation(hash("0xabc"), unused).await;

    assert_eq!(state, TransactionState::Failed);
    assert_eq!(node.calls(), 0);
}

#[tokio::test]
async fn test_finalized_receipt_is_idempotent() {
    let node = ScriptedNode::mined_after(0);
    let tracker = ConfirmationTracker::new(immediate());

    let first = tracker.await_confirmation(hash("0xabc"), Some(&node)).await;
    let second = tracker.await_confirmation(hash("0xabc"), Some(&node)).await;

    assert_eq!(first, TransactionState::Sent);
    assert_eq!(second, TransactionState::Sent);
    assert_eq!(node.calls(), 2);
}

#[tokio::test]
async fn test_reverted_receipt_still_counts_as_sent() {
    let node = ScriptedNode::new([Reply::Pending, Reply::Mined { success: false }]);
    let state = ConfirmationTracker::new(immediate())
        .await_confirmation(hash("0xbad"), Some(&node))
        .await;
    assert_eq!(state, TransactionState::Sent);
}

#[tokio::test]
async fn test_error_after_pending_stops_polling() {
    let node = ScriptedNode::new([Reply::Pending, Reply::Error("timeout"), Reply::Mined { success: true }]);
    let state = ConfirmationTracker::new(immediate())
        .await_confirmation(hash("0xabc"), Some(&node))
        .await;
    assert_eq!(state, TransactionState::Failed);
    assert_eq!(node.calls(), 2);
}

#[tokio::test]
async fn test_attempt_limit() {
    let node = ScriptedNode::new([Reply::Pending]);
    let tracker = ConfirmationTracker::new(immediate().with_max_attempts(10));

    let state = tracker.await_confirmation(hash("0xabc"), Some(&node)).await;

    assert_eq!(state, TransactionState::Failed);
    assert_eq!(node.calls(), 10);
}

#[tokio::test]
async fn test_deadline_bounds_the_wait() {
    let node = ScriptedNode::new([Reply::Pending]);
    let policy = PollPolicy::fixed(Duration::from_millis(10)).with_deadline(Duration::from_millis(100));
    let tracker = ConfirmationTracker::new(policy);

    let started = tokio::time::Instant::now();
    let state = tracker.await_confirmation(hash("0xabc"), Some(&node)).await;

    assert_eq!(state, TransactionState::Failed);
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(node.calls() >= 2);
}

#[tokio::test]
async fn test_shutdown_cancels_pending_wait() {
    let node = Arc::new(ScriptedNode::new([Reply::Pending]));
    let shutdown = Shutdown::new();
    let mut cancel = shutdown.subscribe();

    let waiter = {
        let node = node.clone();
        tokio::spawn(async move {
            let tracker = ConfirmationTracker::new(PollPolicy::fixed(Duration::from_millis(5)));
            tracker
                .await_confirmation_until(hash("0xabc"), Some(node.as_ref()), Some(&mut cancel))
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.trigger();

    let state = tokio::time::timeout(Duration::from_secs(2), waiter)
        .await
        .expect("tracker did not observe shutdown")
        .unwrap();
    assert_eq!(state, TransactionState::Failed);
    assert!(node.calls() >= 1);
}

#[tokio::test]
async fn test_shutdown_also_cancels_busy_polling() {
    let node = Arc::new(ScriptedNode::new([Reply::Pending]));
    let shutdown = Shutdown::new();
    let mut cancel = shutdown.subscribe();
    shutdown.trigger();

    let state = ConfirmationTracker::new(immediate())
        .await_confirmation_until(hash("0xabc"), Some(node.as_ref()), Some(&mut cancel))
        .await;
    assert_eq!(state, TransactionState::Failed);
}

#[tokio::test]
async fn test_wait_started_after_shutdown_is_cancelled() {
    let node = Arc::new(ScriptedNode::new([Reply::Pending]));
    let shutdown = Shutdown::new();
    shutdown.trigger();
    let mut cancel = shutdown.subscribe();

    let state = tokio::time::timeout(
        Duration::from_secs(2),
        ConfirmationTracker::new(PollPolicy::fixed(Duration::from_millis(5)))
            .await_confirmation_until(hash("0xabc"), Some(node.as_ref()), Some(&mut cancel)),
    )
    .await
    .expect("late wait was not cancelled");
    assert_eq!(state, TransactionState::Failed);
}

#[tokio::test]
async fn test_concurrent_waits_share_a_tracker() {
    let tracker = Arc::new(ConfirmationTracker::new(immediate()));
    let fast = Arc::new(ScriptedNode::mined_after(1));
    let failing = Arc::new(ScriptedNode::new([Reply::Pending, Reply::Error("reset")]));

    let a = {
        let (tracker, node) = (tracker.clone(), fast.clone());
        tokio::spawn(async move { tracker.await_confirmation(hash("0x01"), Some(node.as_ref())).await })
    };
    let b = {
        let (tracker, node) = (tracker.clone(), failing.clone());
        tokio::spawn(async move { tracker.await_confirmation(hash("0x02"), Some(node.as_ref())).await })
    };

    assert_eq!(a.await.unwrap(), TransactionState::Sent);
    assert_eq!(b.await.unwrap(), TransactionState::Failed);
    assert_eq!(fast.calls(), 2);
    assert_eq!(failing.calls(), 2);
}
