/*!
 * Enclave Lifecycle Core
 * Reserves physical memory partitions for enclaves, tracks live enclaves
 * under stable handles, and delivers signals into per-enclave mailboxes
 */

pub mod core;
pub mod enclave;
pub mod memory;
pub mod registry;
pub mod signals;

// Re-exports
pub use enclave::{Enclave, EnclaveError, EnclaveManager, EnclaveResult};
pub use memory::{required_pages, EnclaveLayout, Region, RegionAllocator, RegionError};
pub use registry::{HandleRegistry, RegistryError, RegistryStats};
pub use signals::{Mailbox, Signal, SignalDelivery, SignalError};
