use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Admits at most one in-flight operation at a time.
///
/// `try_acquire` hands out a guard only while the slot is free; dropping the
/// guard (on whatever thread owns it) frees the slot again.
#[derive(Clone, Default)]
pub struct SingleFlightSlot {
    busy: Arc<AtomicBool>,
}

impl SingleFlightSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<SlotGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SlotGuard {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

#[must_use = "the slot is freed as soon as the guard is dropped"]
pub struct SlotGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
