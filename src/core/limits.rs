/*!
 * System Limits and Constants
 *
 * Centralized location for the enclave core's limits and fixed overheads.
 */

use crate::core::types::{Handle, Order, PageCount};

/// Lowest valid enclave handle
/// Keeps handles visually distinct from file descriptors and PIDs
pub const HANDLE_MIN: Handle = 0x1000;

/// One past the highest valid enclave handle (exclusive bound)
pub const HANDLE_MAX: Handle = 0xFFFF;

/// Number of simultaneously live handles
pub const HANDLE_CAPACITY: usize = (HANDLE_MAX - HANDLE_MIN) as usize;

/// Fixed page-table overhead per enclave, in pages
///
/// Covers a nested two-level page-table layout: 1 top-level table,
/// 2 enclave-owned tables, 2 runtime-owned tables, rounded up generously.
/// A conservative over-estimate, not an exact page-table computation.
pub const PAGE_TABLE_OVERHEAD_PAGES: PageCount = 15;

/// Largest supported region order (2^MAX_REGION_ORDER pages)
/// Guards the order computation against absurd requests
pub const MAX_REGION_ORDER: Order = 20;
