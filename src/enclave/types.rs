/*!
 * Enclave Types
 * Record sub-states and lifecycle errors
 */

use crate::core::types::{Order, PhysAddr, VirtAddr};
use crate::memory::{Region, RegionError};
use crate::registry::RegistryError;
use thiserror::Error;

/// Enclave operation result
pub type EnclaveResult<T> = Result<T, EnclaveError>;

/// Enclave lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnclaveError {
    /// The record reference is absent or the record was already destroyed
    #[error("invalid enclave record")]
    InvalidRecord,

    #[error("EPM construction failed over region at {pa:#x}")]
    EpmInitFailed { pa: PhysAddr },

    #[error("enclave manager misconfigured: {0} not provided")]
    Misconfigured(&'static str),

    #[error(transparent)]
    Region(#[from] RegionError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Opaque token identifying backend-side state for a sub-resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackendToken(pub u64);

/// Enclave private memory (EPM) sub-allocator state
///
/// Owns the backing region once construction succeeds; the region is
/// released through the region allocator after backend teardown.
#[derive(Debug)]
pub struct EpmState {
    pub token: BackendToken,
    pub region: Region,
}

/// Untrusted shared memory (UTM) state
///
/// Constructed outside this core and attached to a record; its pages are
/// owned and freed by the UTM backend, not by the region allocator.
#[derive(Debug)]
pub struct UtmState {
    pub token: BackendToken,
    pub pa: PhysAddr,
    pub vaddr: VirtAddr,
    pub order: Order,
}
