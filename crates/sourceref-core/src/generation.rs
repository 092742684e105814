use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Token for one caller request. Only the most recently issued one is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic request counter implementing "latest request wins".
///
/// Take a generation before starting async work and check
/// [`RequestGenerations::is_current`] once it completes; a stale result should
/// be discarded. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct RequestGenerations {
    latest: Arc<AtomicU64>,
}

impl RequestGenerations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new generation, superseding every earlier one.
    pub fn begin(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn current(&self) -> Generation {
        Generation(self.latest.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.current() == generation
    }
}
