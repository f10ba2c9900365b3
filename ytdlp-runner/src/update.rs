use std::sync::atomic::{AtomicBool, Ordering};

static UPDATE_RUNNING: AtomicBool = AtomicBool::new(false);

/// Claim on the process-wide self-update slot, released on drop.
pub(crate) struct UpdateGuard(());

impl UpdateGuard {
    /// Returns `None` while another update holds the slot.
    pub(crate) fn acquire() -> Option<Self> {
        UPDATE_RUNNING
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(()))
    }
}

impl Drop for UpdateGuard {
    fn drop(&mut self) {
        UPDATE_RUNNING.store(false, Ordering::Release);
    }
}

pub fn is_update_running() -> bool {
    UPDATE_RUNNING.load(Ordering::Acquire)
}
