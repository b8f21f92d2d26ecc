/*!
 * Memory Types
 * Region descriptors and allocation errors
 */

use crate::core::types::{Order, PageCount, PhysAddr, VirtAddr, PAGE_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Region operation result
pub type RegionResult<T> = Result<T, RegionError>;

/// Region allocation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    #[error("region allocation failed: {pages} page(s) at order {order}, both contiguous and fallback allocators refused")]
    AllocationFailed { pages: PageCount, order: Order },

    #[error("region request too large: {pages} page(s) exceeds maximum order {max_order}")]
    RequestTooLarge { pages: PageCount, max_order: Order },
}

/// Which allocation strategy produced a region
///
/// A release must route back to the allocator that produced the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionSource {
    /// Platform contiguous reservation (primary)
    Contiguous,
    /// Generic power-of-two page allocator (fallback)
    Pages,
}

/// A physically contiguous, power-of-two-sized, page-aligned block
/// reserved for one enclave
///
/// Not cloneable: a region descriptor is owned by exactly one holder and
/// released exactly once.
#[derive(Debug)]
pub struct Region {
    /// Base physical address
    pub pa: PhysAddr,
    /// Virtual mapping of the region in this process
    pub vaddr: VirtAddr,
    /// Region size is 2^order pages
    pub order: Order,
    /// Strategy that produced the region
    pub source: RegionSource,
}

impl Region {
    /// Number of pages in the region
    #[inline]
    #[must_use]
    pub fn page_count(&self) -> PageCount {
        1usize << self.order
    }

    /// Region size in bytes
    #[inline]
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.page_count() * PAGE_SIZE
    }
}
