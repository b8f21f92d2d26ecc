/*!
 * Enclave Handle Registry
 *
 * Concurrent map from small integer handles in [HANDLE_MIN, HANDLE_MAX) to
 * live enclave records. Handle allocation is serialized under one lock and
 * always yields the smallest available handle; freed handles are reused.
 * Entries are removed before record teardown begins, so a lookup never
 * observes a record mid-teardown.
 */

use super::types::{RegistryError, RegistryResult, RegistryStats};
use crate::core::limits::{HANDLE_CAPACITY, HANDLE_MAX, HANDLE_MIN};
use crate::core::types::Handle;
use crate::enclave::Enclave;
use ahash::RandomState;
use dashmap::DashMap;
use log::warn;
use parking_lot::Mutex;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

/// Smallest-available handle allocator with reuse
///
/// Freed handles are always below the cursor, so the smallest available
/// handle is min(recycled) when any handle has been freed, else the cursor.
#[derive(Debug)]
struct HandleAllocator {
    next: Handle,
    recycled: BinaryHeap<Reverse<Handle>>,
}

impl HandleAllocator {
    fn new() -> Self {
        Self {
            next: HANDLE_MIN,
            recycled: BinaryHeap::new(),
        }
    }

    fn alloc(&mut self) -> Option<Handle> {
        if let Some(Reverse(handle)) = self.recycled.pop() {
            return Some(handle);
        }
        if self.next >= HANDLE_MAX {
            return None;
        }
        let handle = self.next;
        self.next += 1;
        Some(handle)
    }

    fn free(&mut self, handle: Handle) {
        self.recycled.push(Reverse(handle));
    }
}

/// Process-wide enclave handle registry
pub struct HandleRegistry {
    entries: DashMap<Handle, Arc<Enclave>, RandomState>,
    handles: Mutex<HandleAllocator>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(RandomState::new()),
            handles: Mutex::new(HandleAllocator::new()),
        }
    }

    /// Insert a record under the smallest available handle
    ///
    /// On exhaustion the record is not stored; the caller keeps ownership.
    pub fn insert(&self, enclave: Arc<Enclave>) -> RegistryResult<Handle> {
        let handle = self.handles.lock().alloc();
        let handle = match handle {
            Some(handle) => handle,
            None => {
                warn!("handle space exhausted ({} handles live)", HANDLE_CAPACITY);
                return Err(RegistryError::HandleSpaceExhausted {
                    capacity: HANDLE_CAPACITY,
                });
            }
        };
        self.entries.insert(handle, enclave);
        Ok(handle)
    }

    /// Remove and return the record at `handle`
    ///
    /// Does not destroy the record; lifecycle teardown is the caller's
    /// separate step. Later lookups of `handle` observe absence until the
    /// handle is reused.
    pub fn remove(&self, handle: Handle) -> Option<Arc<Enclave>> {
        let (_, enclave) = self.entries.remove(&handle)?;
        self.handles.lock().free(handle);
        Some(enclave)
    }

    /// Look up the record at `handle` without removing it
    pub fn get(&self, handle: Handle) -> Option<Arc<Enclave>> {
        self.entries.get(&handle).map(|e| Arc::clone(e.value()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        let handles = self.handles.lock();
        RegistryStats {
            live: self.entries.len(),
            capacity: HANDLE_CAPACITY,
            recycled: handles.recycled.len(),
        }
    }
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
