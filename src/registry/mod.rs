/*!
 * Registry Module
 * Process-wide map from bounded integer handles to live enclave records
 */

mod registry;
pub mod types;

pub use registry::HandleRegistry;
pub use types::{RegistryError, RegistryResult, RegistryStats};
