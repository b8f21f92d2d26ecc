/*!
 * Backend Contracts
 * Construction and teardown contracts for the EPM and UTM collaborators
 */

use super::types::{BackendToken, EpmState, UtmState};
use crate::memory::Region;

/// Enclave page-management (EPM) sub-allocator contract
///
/// `init` builds free-page tracking over a region that is already zeroed
/// and returns an opaque token for the state it created; `None` means
/// construction failed and nothing was built. `destroy` tears that state
/// down; the region's pages are released by the caller afterwards.
pub trait EpmBackend: Send + Sync {
    fn init(&self, region: &Region) -> Option<BackendToken>;
    fn destroy(&self, state: &EpmState);
}

/// Untrusted shared memory (UTM) teardown contract
///
/// Construction happens outside this core; only teardown is consumed here.
/// `destroy` frees the backend state and the pages it owns.
pub trait UtmBackend: Send + Sync {
    fn destroy(&self, state: &UtmState);
}
