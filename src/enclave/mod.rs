/*!
 * Enclave Module
 * Enclave records and lifecycle management
 */

pub mod manager;
pub mod record;
pub mod traits;
pub mod types;

pub use manager::{EnclaveManager, EnclaveManagerBuilder};
pub use record::Enclave;
pub use traits::{EpmBackend, UtmBackend};
pub use types::{BackendToken, EnclaveError, EnclaveResult, EpmState, UtmState};
