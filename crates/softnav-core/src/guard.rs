//! Single-flight transition slot

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// RAII hold on the engine's one transition slot. Acquisition fails
/// while another transition is in flight; the slot frees when the guard
/// drops, error and cancel paths included.
pub(crate) struct TransitionGuard {
    flag: Arc<AtomicBool>,
}

impl TransitionGuard {
    pub(crate) fn try_acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for TransitionGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_guard_at_a_time() {
        let flag = Arc::new(AtomicBool::new(false));

        let first = TransitionGuard::try_acquire(&flag);
        assert!(first.is_some());
        assert!(TransitionGuard::try_acquire(&flag).is_none());

        drop(first);
        assert!(!flag.load(Ordering::Acquire));
        assert!(TransitionGuard::try_acquire(&flag).is_some());
    }
}
