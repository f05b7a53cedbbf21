//! Generation counter for discarding stale asynchronous loads

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared generation counter
///
/// Each load calls [`LoadGuard::begin`] and keeps the returned ticket. When
/// the result arrives it is applied only if [`LoadGuard::is_current`] still
/// holds, that is no later load started and the owner was not torn down.
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct LoadGuard {
    generation: Arc<AtomicU64>,
}

/// Generation captured when a load started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

impl LoadGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load, superseding every ticket issued before
    pub fn begin(&self) -> LoadTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        LoadTicket { generation }
    }

    /// True if `ticket` belongs to the newest load
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Invalidate every outstanding ticket
    pub fn teardown(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
