// src/session/mod.rs

//! Session identifiers.
//!
//! A session is a small integer handed to the runtime (`NTT_SESSION_ID`) so
//! that parallel instances can isolate their resources, e.g. pick distinct
//! local addresses. Ids come from a [`SessionAllocator`] and are held by a
//! [`Session`] guard that gives them back when dropped.

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::trace;

/// Default number of sessions of a [`LocalSessions`] pool.
pub const DEFAULT_CAPACITY: u32 = 255;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session pool exhausted ({capacity} sessions in use)")]
    PoolExhausted { capacity: u32 },
}

pub trait SessionAllocator: Send + Sync + Debug {
    fn acquire(&self) -> Result<u32, SessionError>;
    fn release(&self, id: u32);
}

/// In-process allocator handing out the smallest free id, starting at 1.
#[derive(Debug)]
pub struct LocalSessions {
    capacity: u32,
    used: Mutex<BTreeSet<u32>>,
}

impl LocalSessions {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            used: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn in_use(&self) -> usize {
        self.used
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for LocalSessions {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SessionAllocator for LocalSessions {
    fn acquire(&self) -> Result<u32, SessionError> {
        let mut used = self.used.lock().unwrap_or_else(PoisonError::into_inner);
        let id = (1..=self.capacity)
            .find(|id| !used.contains(id))
            .ok_or(SessionError::PoolExhausted {
                capacity: self.capacity,
            })?;
        used.insert(id);
        Ok(id)
    }

    fn release(&self, id: u32) {
        self.used
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }
}

/// An acquired session id, released on drop.
#[derive(Debug)]
pub struct Session {
    id: u32,
    allocator: Arc<dyn SessionAllocator>,
}

impl Session {
    pub fn acquire(allocator: Arc<dyn SessionAllocator>) -> Result<Self, SessionError> {
        let id = allocator.acquire()?;
        trace!(session = id, "session acquired");
        Ok(Self { id, allocator })
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        trace!(session = self.id, "session released");
        self.allocator.release(self.id);
    }
}
