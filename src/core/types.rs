/*!
 * Core Types
 * Common types used across the enclave core
 */

/// Enclave handle type (bounded small integer, see `limits`)
pub type Handle = u32;

/// Physical address type
pub type PhysAddr = u64;

/// Virtual address of a mapping in this process
pub type VirtAddr = usize;

/// Count of whole pages
pub type PageCount = usize;

/// Power-of-two allocation order (region size = 2^order pages)
pub type Order = u32;

/// Page size in bytes
pub const PAGE_SIZE: usize = 4096;

/// log2 of `PAGE_SIZE`
pub const PAGE_SHIFT: u32 = 12;

/// Round a byte size up to the next page boundary
#[inline]
#[must_use]
pub const fn page_up(size: usize) -> usize {
    (size + PAGE_SIZE - 1) & !(PAGE_SIZE - 1)
}
