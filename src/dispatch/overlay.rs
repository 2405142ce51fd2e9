//! Shared busy overlay.
//!
//! One overlay exists per session. Requests that ask for it hold a
//! [`BusyGuard`] for as long as they run; the overlay is visible while at
//! least one guard is alive. Guards release on drop, so the overlay cannot be
//! left showing when a request fails, is aborted, or unwinds.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Handle to the session's busy overlay
#[derive(Debug, Clone, Default)]
pub struct BusyOverlay {
    holders: Arc<AtomicUsize>,
}

impl BusyOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the overlay until the returned guard is dropped
    pub fn acquire(&self) -> BusyGuard {
        if self.holders.fetch_add(1, Ordering::SeqCst) == 0 {
            tracing::debug!("Busy overlay shown");
        }
        BusyGuard {
            holders: Arc::clone(&self.holders),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.holders() > 0
    }

    /// Number of requests currently holding the overlay
    pub fn holders(&self) -> usize {
        self.holders.load(Ordering::SeqCst)
    }
}

/// Keeps the overlay visible while alive
#[derive(Debug)]
pub struct BusyGuard {
    holders: Arc<AtomicUsize>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if self.holders.fetch_sub(1, Ordering::SeqCst) == 1 {
            tracing::debug!("Busy overlay hidden");
        }
    }
}
