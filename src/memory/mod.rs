/*!
 * Memory Module
 * Physical region acquisition and enclave memory sizing
 */

pub mod layout;
pub mod region;
pub mod traits;
pub mod types;

pub use layout::{required_pages, EnclaveLayout};
pub use region::{order_for, RegionAllocator, RegionStats};
pub use traits::{ContiguousAllocator, PageAllocator};
pub use types::{Region, RegionError, RegionResult, RegionSource};
