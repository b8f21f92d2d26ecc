/*!
 * Enclave Record
 * Control block owning an enclave's memory states and signal mailbox
 */

use super::types::{EpmState, UtmState};
use crate::core::types::{Order, PhysAddr};
use crate::signals::Mailbox;
use parking_lot::Mutex;

#[derive(Debug, Default)]
pub(crate) struct EnclaveInner {
    pub epm: Option<EpmState>,
    pub utm: Option<UtmState>,
    pub destroyed: bool,
}

/// Enclave control block
///
/// The EPM and UTM states are independently optional: either may be absent
/// on a record whose construction failed partway, and teardown checks each
/// on its own. The mailbox has its own lock, so signal traffic never
/// contends with lifecycle operations or with other enclaves.
#[derive(Debug)]
pub struct Enclave {
    pub(crate) inner: Mutex<EnclaveInner>,
    mailbox: Mailbox,
}

impl Enclave {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(EnclaveInner::default()),
            mailbox: Mailbox::new(),
        }
    }

    /// Signal mailbox embedded in this record
    #[inline]
    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    /// Whether EPM construction completed for this record
    pub fn has_epm(&self) -> bool {
        self.inner.lock().epm.is_some()
    }

    /// Whether a UTM state is attached to this record
    pub fn has_utm(&self) -> bool {
        self.inner.lock().utm.is_some()
    }

    /// Whether this record has been destroyed
    pub fn is_destroyed(&self) -> bool {
        self.inner.lock().destroyed
    }

    /// EPM region base physical address, when present
    pub fn epm_pa(&self) -> Option<PhysAddr> {
        self.inner.lock().epm.as_ref().map(|epm| epm.region.pa)
    }

    /// EPM region allocation order, when present
    pub fn epm_order(&self) -> Option<Order> {
        self.inner.lock().epm.as_ref().map(|epm| epm.region.order)
    }

    /// Attach a UTM state constructed by the outer layer
    ///
    /// Refused when the record is destroyed or already carries a UTM; the
    /// state is handed back so the caller can tear it down.
    pub fn attach_utm(&self, utm: UtmState) -> Result<(), UtmState> {
        let mut inner = self.inner.lock();
        if inner.destroyed || inner.utm.is_some() {
            return Err(utm);
        }
        inner.utm = Some(utm);
        Ok(())
    }
}
