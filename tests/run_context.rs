// tests/run_context.rs

use std::time::Duration;

use k3run::control::{ContextError, RunContext};
use k3run_test_utils::with_timeout;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn fresh_context_is_live() {
    let ctx = RunContext::new();
    assert_eq!(ctx.err(), None);
    assert!(ctx.deadline().is_none());
}

#[tokio::test]
async fn cancel_resolves_done() {
    let ctx = RunContext::new();
    ctx.cancel();
    with_timeout(ctx.done()).await;
    assert_eq!(ctx.err(), Some(ContextError::Cancelled));
}

#[tokio::test]
async fn deadline_resolves_done() {
    let ctx = RunContext::new().with_timeout(Duration::from_millis(20));
    with_timeout(ctx.done()).await;
    assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
}

#[tokio::test]
async fn deadline_wins_over_cancellation() {
    let ctx = RunContext::new().with_timeout(Duration::from_millis(10));
    ctx.cancel();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
}

#[tokio::test]
async fn child_never_extends_parent_deadline() {
    let parent = RunContext::new().with_timeout(Duration::from_millis(50));
    let child = parent.with_timeout(Duration::from_secs(60));
    assert_eq!(child.deadline(), parent.deadline());

    let shorter = parent.with_timeout(Duration::from_millis(5));
    assert!(shorter.deadline() < parent.deadline());
}

#[tokio::test]
async fn cancelling_parent_cancels_child_only_downwards() {
    let token = CancellationToken::new();
    let parent = RunContext::from_token(token.clone());
    let child = parent.with_timeout(Duration::from_secs(60));

    child.cancel();
    assert_eq!(child.err(), Some(ContextError::Cancelled));
    assert_eq!(parent.err(), None);

    let other = parent.with_timeout(Duration::from_secs(60));
    token.cancel();
    with_timeout(other.done()).await;
    assert_eq!(other.err(), Some(ContextError::Cancelled));
}
