//! Caps the number of concurrent browser processes.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::BrowserError;

/// Bounds concurrent browser sessions across the whole process.
///
/// Each audit holds one permit from launch to close. Acquisition never
/// waits: callers surface [`BrowserError::PoolExhausted`] instead of
/// queueing, so overload stays visible at the HTTP boundary.
#[derive(Clone)]
pub struct SessionLimiter {
    semaphore: Arc<Semaphore>,
}

impl SessionLimiter {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_sessions.max(1))),
        }
    }

    /// Try to reserve a session slot without waiting.
    pub fn try_acquire(&self) -> Result<SessionPermit, BrowserError> {
        match Arc::clone(&self.semaphore).try_acquire_owned() {
            Ok(permit) => Ok(SessionPermit { _permit: permit }),
            Err(_) => Err(BrowserError::PoolExhausted),
        }
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// Held for the duration of one audit; dropping it frees the slot.
pub struct SessionPermit {
    _permit: OwnedSemaphorePermit,
}
