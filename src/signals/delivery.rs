/*!
 * Signal Delivery
 * Handle-addressed posting and clearing of enclave signals
 */

use super::types::{Signal, SignalError, SignalResult};
use crate::core::types::Handle;
use crate::registry::HandleRegistry;
use log::debug;
use std::sync::Arc;

/// Posts signals into enclave mailboxes, addressed by registry handle
pub struct SignalDelivery {
    registry: Arc<HandleRegistry>,
}

impl SignalDelivery {
    pub fn new(registry: Arc<HandleRegistry>) -> Self {
        Self { registry }
    }

    /// Post a signal to the enclave registered under `handle`
    ///
    /// Rejected when the handle is unknown, the signal number is 0, or a
    /// signal is already pending in the target mailbox.
    pub fn post(&self, handle: Handle, signal: Signal) -> SignalResult<()> {
        if signal.signum == 0 {
            return Err(SignalError::InvalidSignal(0));
        }
        let enclave = self
            .registry
            .get(handle)
            .ok_or(SignalError::EnclaveNotFound(handle))?;
        enclave.mailbox().post(signal)?;
        debug!("signal {} posted to enclave {:#x}", signal.signum, handle);
        Ok(())
    }

    /// Clear any pending signal for the enclave under `handle`
    pub fn clear(&self, handle: Handle) -> SignalResult<()> {
        let enclave = self
            .registry
            .get(handle)
            .ok_or(SignalError::EnclaveNotFound(handle))?;
        enclave.mailbox().clear();
        Ok(())
    }
}

impl Clone for SignalDelivery {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}
