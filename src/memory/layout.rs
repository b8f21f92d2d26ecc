/*!
 * Enclave Memory Sizing
 * Computes the minimum page count an enclave's memory regions require
 */

use crate::core::limits::PAGE_TABLE_OVERHEAD_PAGES;
use crate::core::types::{page_up, PageCount, PAGE_SIZE};
use serde::{Deserialize, Serialize};

/// Size parameters for an enclave's memory regions, in bytes
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EnclaveLayout {
    pub app_size: usize,
    pub app_stack_size: usize,
    pub runtime_size: usize,
    pub runtime_stack_size: usize,
}

impl EnclaveLayout {
    /// Minimum page count for this layout, including page-table overhead
    #[inline]
    #[must_use]
    pub fn required_pages(&self) -> PageCount {
        required_pages(
            self.app_size,
            self.app_stack_size,
            self.runtime_size,
            self.runtime_stack_size,
        )
    }
}

/// Minimum number of pages needed for an enclave's memory regions
///
/// Each size is rounded up to the page size and divided into whole pages;
/// the four counts are summed, plus `PAGE_TABLE_OVERHEAD_PAGES` for the
/// nested two-level (enclave + runtime) page-table layout. The overhead is
/// a conservative over-estimate. A zero size contributes zero pages.
#[must_use]
pub fn required_pages(
    app_size: usize,
    app_stack_size: usize,
    runtime_size: usize,
    runtime_stack_size: usize,
) -> PageCount {
    let mut pages: PageCount = 0;
    pages += page_up(app_size) / PAGE_SIZE;
    pages += page_up(app_stack_size) / PAGE_SIZE;
    pages += page_up(runtime_size) / PAGE_SIZE;
    pages += page_up(runtime_stack_size) / PAGE_SIZE;
    pages + PAGE_TABLE_OVERHEAD_PAGES
}
