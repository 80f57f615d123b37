//! Explicit mutual exclusion for callers that serialise whole sessions.
//!
//! Sessions are immutable once opened and need no locking to serve queries.
//! Some front ends still want at most one session in flight (for example a
//! single output channel); they hold a [`SessionGate`] and take a permit for
//! the lifetime of each session instead of relying on a process-wide flag.

use std::sync::{Condvar, Mutex, PoisonError};

use tracing::trace;

/// Gate admitting one permit holder at a time.
///
/// # Examples
/// ```
/// use dendro_core::SessionGate;
///
/// let gate = SessionGate::new();
/// let permit = gate.acquire();
/// assert!(gate.try_acquire().is_none());
/// drop(permit);
/// assert!(gate.try_acquire().is_some());
/// ```
#[derive(Debug, Default)]
pub struct SessionGate {
    busy: Mutex<bool>,
    released: Condvar,
}

impl SessionGate {
    /// Creates an open gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until the gate is free and returns a permit.
    pub fn acquire(&self) -> SessionPermit<'_> {
        let mut busy = self.busy.lock().unwrap_or_else(PoisonError::into_inner);
        while *busy {
            busy = self
                .released
                .wait(busy)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *busy = true;
        trace!("session permit acquired");
        SessionPermit { gate: self }
    }

    /// Returns a permit when the gate is free, or `None` when it is held.
    #[must_use]
    pub fn try_acquire(&self) -> Option<SessionPermit<'_>> {
        let mut busy = self.busy.lock().unwrap_or_else(PoisonError::into_inner);
        if *busy {
            return None;
        }
        *busy = true;
        Some(SessionPermit { gate: self })
    }

    /// Returns whether a permit is currently held.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        *self.busy.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&self) {
        let mut busy = self.busy.lock().unwrap_or_else(PoisonError::into_inner);
        *busy = false;
        drop(busy);
        self.released.notify_one();
        trace!("session permit released");
    }
}

/// Proof of exclusive access; releases the gate on drop.
#[derive(Debug)]
#[must_use = "the gate is released as soon as the permit is dropped"]
pub struct SessionPermit<'a> {
    gate: &'a SessionGate,
}

impl Drop for SessionPermit<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}
