/*!
 * Notification Mailbox
 *
 * Single-slot signal holder embedded in each enclave record. At most one
 * un-drained signal is held; posting into an occupied slot is rejected
 * rather than queued, so a slow consumer can lose signals. Callers that
 * need reliable delivery retry above this layer.
 */

use super::types::{Signal, SignalError, SignalResult};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct SignalSlot {
    signum: u32,
    code: i32,
}

/// Single-slot, lock-guarded signal mailbox
#[derive(Debug, Default)]
pub struct Mailbox {
    slot: Mutex<SignalSlot>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a signal if the slot is empty
    ///
    /// An occupied slot rejects the post without overwriting; signal
    /// number 0 is rejected as the empty sentinel.
    pub fn post(&self, signal: Signal) -> SignalResult<()> {
        if signal.signum == 0 {
            return Err(SignalError::InvalidSignal(0));
        }
        let mut slot = self.slot.lock();
        if slot.signum != 0 {
            return Err(SignalError::AlreadyPending);
        }
        slot.signum = signal.signum;
        slot.code = signal.code;
        Ok(())
    }

    /// Empty the slot; always succeeds
    pub fn clear(&self) {
        let mut slot = self.slot.lock();
        slot.signum = 0;
        slot.code = 0;
    }

    /// Pending signal, if any, without draining it
    pub fn pending(&self) -> Option<Signal> {
        let slot = self.slot.lock();
        (slot.signum != 0).then(|| Signal::new(slot.signum, slot.code))
    }

    /// Drain the pending signal under a single lock acquisition
    pub fn take(&self) -> Option<Signal> {
        let mut slot = self.slot.lock();
        if slot.signum == 0 {
            return None;
        }
        let signal = Signal::new(slot.signum, slot.code);
        slot.signum = 0;
        slot.code = 0;
        Some(signal)
    }
}
