//! Reference-counted document scroll lock.
//!
//! Overlays that should freeze the page underneath them hold a
//! [`ScrollLockGuard`]. The document is locked when the first guard is
//! acquired and unlocked when the last one is dropped, so any number of
//! overlays can be open at once without one of them unlocking the page
//! while another still needs it.
//!
//! # Examples
//!
//! ```
//! use ultima_core::ScrollLock;
//!
//! let lock = ScrollLock::new();
//! let first = lock.acquire();
//! let second = lock.acquire();
//! drop(first);
//! assert!(lock.is_locked());
//! drop(second);
//! assert!(!lock.is_locked());
//! assert_eq!(lock.stats().releases, 1);
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

type Listener = Arc<dyn Fn(bool) + Send + Sync>;

#[derive(Default)]
struct LockState {
    holders: usize,
    stats: ScrollLockStats,
    listener: Option<Listener>,
}

/// Counters describing how often the document lock actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollLockStats {
    /// Times the document went from scrollable to locked
    pub locks: u64,
    /// Times the document went from locked to scrollable
    pub releases: u64,
}

/// Shared handle to a document scroll lock.
///
/// Clones refer to the same lock. [`ScrollLock::global`] is the instance
/// widgets use unless they are given another one.
#[derive(Clone, Default)]
pub struct ScrollLock {
    state: Arc<Mutex<LockState>>,
}

impl ScrollLock {
    /// Create an independent lock (tests, embedded documents).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide lock.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<ScrollLock> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    fn state(&self) -> MutexGuard<'_, LockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register the host callback that applies the lock to the document.
    ///
    /// Called with `true` when scrolling must stop and `false` when it may
    /// resume. Replaces any previous listener.
    pub fn on_change(&self, listener: impl Fn(bool) + Send + Sync + 'static) {
        self.state().listener = Some(Arc::new(listener));
    }

    /// Take a hold on the lock.
    #[must_use = "the document unlocks as soon as the guard is dropped"]
    pub fn acquire(&self) -> ScrollLockGuard {
        let notify = {
            let mut state = self.state();
            state.holders += 1;
            if state.holders == 1 {
                state.stats.locks += 1;
                state.listener.clone()
            } else {
                None
            }
        };

        if let Some(listener) = notify {
            tracing::debug!("document scroll locked");
            listener(true);
        }

        ScrollLockGuard {
            lock: self.clone(),
        }
    }

    fn release(&self) {
        let notify = {
            let mut state = self.state();
            match state.holders {
                0 => {
                    tracing::warn!("scroll lock released with no holders");
                    return;
                }
                1 => {
                    state.holders = 0;
                    state.stats.releases += 1;
                    Some(state.listener.clone())
                }
                _ => {
                    state.holders -= 1;
                    None
                }
            }
        };

        if let Some(listener) = notify {
            tracing::debug!("document scroll released");
            if let Some(listener) = listener {
                listener(false);
            }
        }
    }

    /// Whether the document is currently locked.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.state().holders > 0
    }

    /// Number of live guards.
    #[must_use]
    pub fn holders(&self) -> usize {
        self.state().holders
    }

    /// Lock/release counters.
    #[must_use]
    pub fn stats(&self) -> ScrollLockStats {
        self.state().stats
    }
}

impl fmt::Debug for ScrollLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("ScrollLock")
            .field("holders", &state.holders)
            .field("stats", &state.stats)
            .finish_non_exhaustive()
    }
}

/// A live hold on a [`ScrollLock`]. Dropping it gives the hold back.
#[derive(Debug)]
pub struct ScrollLockGuard {
    lock: ScrollLock,
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.lock.release();
    }
}
