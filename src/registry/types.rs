/*!
 * Registry Types
 * Handle allocation errors and occupancy counters
 */

use serde::Serialize;
use thiserror::Error;

/// Registry operation result
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("handle space exhausted: all {capacity} handles are live")]
    HandleSpaceExhausted { capacity: usize },
}

/// Registry occupancy counters
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStats {
    pub live: usize,
    pub capacity: usize,
    pub recycled: usize,
}
