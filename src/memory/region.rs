/*!
 * Physical Region Allocator
 *
 * Acquires a power-of-two-sized contiguous physical region for an enclave,
 * preferring the platform's contiguous reservation and falling back to the
 * generic page allocator. Every region is zero-filled before it is handed
 * to a sub-allocator: stale contents must never cross into a new trust
 * domain, regardless of which allocator produced the pages.
 */

use super::traits::{ContiguousAllocator, PageAllocator};
use super::types::{Region, RegionError, RegionResult, RegionSource};
use crate::core::limits::MAX_REGION_ORDER;
use crate::core::types::{Order, PageCount};
use log::{debug, warn};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Smallest order such that 2^order >= min_pages
///
/// Requests of zero or one page clamp to order 0; log2 of zero is
/// undefined and must never be taken. Callers bound `min_pages` (see
/// `MAX_REGION_ORDER`) before converting the order back to a page count.
#[inline]
#[must_use]
pub fn order_for(min_pages: PageCount) -> Order {
    if min_pages <= 1 {
        0
    } else {
        min_pages.next_power_of_two().trailing_zeros()
    }
}

/// Counters for region allocation activity
#[derive(Debug, Clone, Serialize)]
pub struct RegionStats {
    pub regions_outstanding: usize,
    pub pages_outstanding: usize,
    pub total_allocations: usize,
    pub fallback_allocations: usize,
    pub failed_allocations: usize,
}

/// Physical region allocator adapter
///
/// The contiguous allocator is optional, mirroring platforms where no
/// contiguous-memory reservation pool is configured; the generic page
/// allocator is always present.
pub struct RegionAllocator {
    contiguous: Option<Arc<dyn ContiguousAllocator>>,
    pages: Arc<dyn PageAllocator>,
    regions_outstanding: AtomicUsize,
    pages_outstanding: AtomicUsize,
    total_allocations: AtomicUsize,
    fallback_allocations: AtomicUsize,
    failed_allocations: AtomicUsize,
}

impl RegionAllocator {
    pub fn new(pages: Arc<dyn PageAllocator>) -> Self {
        Self {
            contiguous: None,
            pages,
            regions_outstanding: AtomicUsize::new(0),
            pages_outstanding: AtomicUsize::new(0),
            total_allocations: AtomicUsize::new(0),
            fallback_allocations: AtomicUsize::new(0),
            failed_allocations: AtomicUsize::new(0),
        }
    }

    /// Configure the primary contiguous-reservation strategy
    #[must_use]
    pub fn with_contiguous(mut self, contiguous: Arc<dyn ContiguousAllocator>) -> Self {
        self.contiguous = Some(contiguous);
        self
    }

    /// Reserve a zero-filled region of at least `min_pages` pages
    ///
    /// The region's page count is the request rounded up to a power of
    /// two. Fails only when both strategies refuse the allocation.
    pub fn allocate(&self, min_pages: PageCount) -> RegionResult<Region> {
        if min_pages > (1usize << MAX_REGION_ORDER) {
            return Err(RegionError::RequestTooLarge {
                pages: min_pages,
                max_order: MAX_REGION_ORDER,
            });
        }
        let order = order_for(min_pages);
        let count = 1usize << order;

        let mut region = None;
        if let Some(ref contiguous) = self.contiguous {
            if let Some((vaddr, pa)) = contiguous.alloc(count, order) {
                if vaddr != 0 && pa != 0 {
                    region = Some(Region {
                        pa,
                        vaddr,
                        order,
                        source: RegionSource::Contiguous,
                    });
                }
            }
        }

        if region.is_none() {
            if let Some(vaddr) = self.pages.alloc_pages(order) {
                if vaddr != 0 {
                    let pa = self.pages.virt_to_phys(vaddr);
                    self.fallback_allocations.fetch_add(1, Ordering::Relaxed);
                    region = Some(Region {
                        pa,
                        vaddr,
                        order,
                        source: RegionSource::Pages,
                    });
                }
            }
        }

        let region = match region {
            Some(region) => region,
            None => {
                self.failed_allocations.fetch_add(1, Ordering::Relaxed);
                warn!("failed to allocate {} page(s) at order {}", count, order);
                return Err(RegionError::AllocationFailed {
                    pages: count,
                    order,
                });
            }
        };

        // Zero the region before any sub-allocator sees it. The guarantee
        // must hold regardless of allocator choice, so the fill is never
        // skipped even when the allocator zeroes its own pages.
        //
        // SAFETY: both allocator contracts guarantee `vaddr` is a valid,
        // writable mapping of at least `byte_len()` bytes until the region
        // is released.
        unsafe {
            std::ptr::write_bytes(region.vaddr as *mut u8, 0, region.byte_len());
        }

        self.regions_outstanding.fetch_add(1, Ordering::Relaxed);
        self.pages_outstanding.fetch_add(count, Ordering::Relaxed);
        self.total_allocations.fetch_add(1, Ordering::Relaxed);
        debug!(
            "allocated region: {} page(s) at order {}, pa {:#x}, source {:?}",
            count, order, region.pa, region.source
        );
        Ok(region)
    }

    /// Return a region's pages to the allocator that produced them
    pub fn release(&self, region: Region) {
        let count = region.page_count();
        match region.source {
            RegionSource::Contiguous => {
                if let Some(ref contiguous) = self.contiguous {
                    contiguous.free(region.vaddr, count, region.order);
                }
            }
            RegionSource::Pages => self.pages.free_pages(region.vaddr, region.order),
        }
        self.regions_outstanding.fetch_sub(1, Ordering::Relaxed);
        self.pages_outstanding.fetch_sub(count, Ordering::Relaxed);
        debug!(
            "released region: {} page(s) at order {}, pa {:#x}",
            count, region.order, region.pa
        );
    }

    pub fn stats(&self) -> RegionStats {
        RegionStats {
            regions_outstanding: self.regions_outstanding.load(Ordering::Relaxed),
            pages_outstanding: self.pages_outstanding.load(Ordering::Relaxed),
            total_allocations: self.total_allocations.load(Ordering::Relaxed),
            fallback_allocations: self.fallback_allocations.load(Ordering::Relaxed),
            failed_allocations: self.failed_allocations.load(Ordering::Relaxed),
        }
    }
}
