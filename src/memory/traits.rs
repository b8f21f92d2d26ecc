/*!
 * Platform Allocator Contracts
 * Abstractions over the platform's contiguous and generic page allocators
 */

use crate::core::types::{Order, PageCount, PhysAddr, VirtAddr};

/// Platform contiguous-memory reservation (primary strategy)
///
/// A successful `alloc` yields a writable mapping of at least
/// `pages * PAGE_SIZE` bytes together with the region's physical base.
/// The mapping must stay valid until the matching `free`.
pub trait ContiguousAllocator: Send + Sync {
    /// Reserve `pages` physically contiguous pages (`pages == 2^order`).
    ///
    /// `None`, a null mapping, or a zero physical address all count as
    /// failure and send the caller to the fallback strategy.
    fn alloc(&self, pages: PageCount, order: Order) -> Option<(VirtAddr, PhysAddr)>;

    /// Release a reservation made by `alloc`.
    fn free(&self, vaddr: VirtAddr, pages: PageCount, order: Order);
}

/// Generic power-of-two page allocator (fallback strategy)
///
/// Guarantees contiguity but yields no separate physical address; callers
/// derive it through `virt_to_phys`.
pub trait PageAllocator: Send + Sync {
    /// Allocate 2^order contiguous pages, returning their mapping.
    fn alloc_pages(&self, order: Order) -> Option<VirtAddr>;

    /// Release pages allocated by `alloc_pages`.
    fn free_pages(&self, vaddr: VirtAddr, order: Order);

    /// Platform address-translation convention for fallback mappings.
    fn virt_to_phys(&self, vaddr: VirtAddr) -> PhysAddr;
}
