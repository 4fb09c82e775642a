//! Advance latch: one-shot operator confirmation.
//!
//! The confirm button's rising edge fires a GPIO ISR that calls
//! [`AdvanceLatch::signal`]. The sequencer's wait loop consumes the flag with
//! [`AdvanceLatch::take`], which reads and clears in one atomic swap so an
//! edge arriving between the check and the reset is never lost.
//!
//! Edges that arrive while the flag is already set collapse into one advance;
//! there is no queue.

use core::sync::atomic::{AtomicBool, Ordering};

/// Single-producer / single-consumer advance flag.
#[derive(Debug, Default)]
pub struct AdvanceLatch {
    pending: AtomicBool,
}

impl AdvanceLatch {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Record an advance edge. Lock-free, safe from interrupt context.
    pub fn signal(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Whether an advance is waiting to be consumed.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Consume the pending advance, if any. Returns `true` exactly once per
    /// group of edges signalled since the previous consumption.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Drop any pending advance without acting on it.
    pub fn clear(&self) {
        self.pending.store(false, Ordering::Release);
    }
}

/// Latch fed by the advance button ISR on the device.
pub static ADVANCE_LATCH: AdvanceLatch = AdvanceLatch::new();

/// ISR handler. Register this on the advance GPIO rising edge.
pub fn advance_isr_handler() {
    ADVANCE_LATCH.signal();
}
