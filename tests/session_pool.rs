// tests/session_pool.rs

use std::sync::Arc;

use k3run::session::{LocalSessions, Session, SessionAllocator, SessionError};

#[test]
fn hands_out_smallest_free_id() {
    let pool = LocalSessions::new(3);
    assert_eq!(pool.acquire(), Ok(1));
    assert_eq!(pool.acquire(), Ok(2));
    pool.release(1);
    assert_eq!(pool.acquire(), Ok(1));
    assert_eq!(pool.acquire(), Ok(3));
}

#[test]
fn reports_exhaustion() {
    let pool = LocalSessions::new(1);
    assert_eq!(pool.acquire(), Ok(1));
    assert_eq!(
        pool.acquire(),
        Err(SessionError::PoolExhausted { capacity: 1 })
    );
}

#[test]
fn guard_releases_on_drop() {
    let pool = Arc::new(LocalSessions::new(2));
    let allocator: Arc<dyn SessionAllocator> = pool.clone();

    let first = Session::acquire(Arc::clone(&allocator)).unwrap();
    let second = Session::acquire(Arc::clone(&allocator)).unwrap();
    assert_eq!((first.id(), second.id()), (1, 2));
    assert!(Session::acquire(Arc::clone(&allocator)).is_err());

    drop(first);
    assert_eq!(pool.in_use(), 1);
    let again = Session::acquire(allocator).unwrap();
    assert_eq!(again.id(), 1);
}
