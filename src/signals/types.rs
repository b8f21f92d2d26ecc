/*!
 * Signal Types
 * Signal values and delivery errors
 */

use crate::core::types::Handle;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Signal operation result
pub type SignalResult<T> = Result<T, SignalError>;

/// Signal errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    #[error("no enclave registered under handle {0:#x}")]
    EnclaveNotFound(Handle),

    /// Signal number 0 marks an empty mailbox slot and cannot be posted
    #[error("invalid signal number {0}")]
    InvalidSignal(u32),

    #[error("a signal is already pending; post rejected")]
    AlreadyPending,
}

/// A signal value: number plus an opaque code
///
/// Signal number 0 is reserved as the empty-slot sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub signum: u32,
    pub code: i32,
}

impl Signal {
    pub const fn new(signum: u32, code: i32) -> Self {
        Self { signum, code }
    }
}
