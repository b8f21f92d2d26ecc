/*!
 * Simulation Harness
 *
 * Heap-backed platform allocators and recording backends. Every mapping is
 * a real heap buffer pre-filled with garbage, so the core's zero-fill and
 * exactly-once release behavior are observable. All allocations are
 * counted; `outstanding_pages` must return to zero after teardown.
 */

#![allow(dead_code)]

use enclave_core::core::types::{Order, PageCount, PhysAddr, VirtAddr, PAGE_SIZE};
use enclave_core::enclave::{
    BackendToken, Enclave, EnclaveManager, EpmBackend, EpmState, UtmBackend, UtmState,
};
use enclave_core::memory::{ContiguousAllocator, PageAllocator, Region};
use enclave_core::registry::HandleRegistry;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Byte pattern pre-filled into fresh mappings so un-zeroed pages are
/// detectable
pub const GARBAGE: u8 = 0xA5;

/// Backing storage for simulated mappings, keyed by base vaddr
#[derive(Default)]
pub struct Backing {
    buffers: Mutex<HashMap<VirtAddr, Box<[u8]>>>,
    outstanding: AtomicUsize,
}

impl Backing {
    fn map(&self, pages: PageCount) -> VirtAddr {
        let buf = vec![GARBAGE; pages * PAGE_SIZE].into_boxed_slice();
        let vaddr = buf.as_ptr() as VirtAddr;
        self.buffers.lock().insert(vaddr, buf);
        self.outstanding.fetch_add(pages, Ordering::SeqCst);
        vaddr
    }

    fn unmap(&self, vaddr: VirtAddr, pages: PageCount) {
        let removed = self.buffers.lock().remove(&vaddr);
        assert!(removed.is_some(), "double free of mapping at {vaddr:#x}");
        self.outstanding.fetch_sub(pages, Ordering::SeqCst);
    }

    pub fn outstanding_pages(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }
}

/// Simulated platform contiguous allocator with failure injection
#[derive(Default)]
pub struct SimContiguousAllocator {
    pub backing: Backing,
    pub fail: AtomicBool,
    pub allocs: AtomicUsize,
    pub frees: AtomicUsize,
    pub last_order: AtomicU64,
}

impl SimContiguousAllocator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContiguousAllocator for SimContiguousAllocator {
    fn alloc(&self, pages: PageCount, order: Order) -> Option<(VirtAddr, PhysAddr)> {
        if self.fail.load(Ordering::SeqCst) {
            return None;
        }
        self.allocs.fetch_add(1, Ordering::SeqCst);
        self.last_order.store(u64::from(order), Ordering::SeqCst);
        let vaddr = self.backing.map(pages);
        Some((vaddr, vaddr as PhysAddr))
    }

    fn free(&self, vaddr: VirtAddr, pages: PageCount, _order: Order) {
        self.frees.fetch_add(1, Ordering::SeqCst);
        self.backing.unmap(vaddr, pages);
    }
}

/// Simulated generic page allocator (fallback) with failure injection
#[derive(Default)]
pub struct SimPageAllocator {
    pub backing: Backing,
    pub fail: AtomicBool,
    pub allocs: AtomicUsize,
    pub frees: AtomicUsize,
    pub last_order: AtomicU64,
}

impl SimPageAllocator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageAllocator for SimPageAllocator {
    fn alloc_pages(&self, order: Order) -> Option<VirtAddr> {
        if self.fail.load(Ordering::SeqCst) {
            return None;
        }
        self.allocs.fetch_add(1, Ordering::SeqCst);
        self.last_order.store(u64::from(order), Ordering::SeqCst);
        Some(self.backing.map(1usize << order))
    }

    fn free_pages(&self, vaddr: VirtAddr, order: Order) {
        self.frees.fetch_add(1, Ordering::SeqCst);
        self.backing.unmap(vaddr, 1usize << order);
    }

    fn virt_to_phys(&self, vaddr: VirtAddr) -> PhysAddr {
        vaddr as PhysAddr
    }
}

/// Recording EPM backend that verifies the zeroed-region contract
#[derive(Default)]
pub struct SimEpmBackend {
    pub fail: AtomicBool,
    pub inits: AtomicUsize,
    pub destroys: AtomicUsize,
    pub saw_nonzero: AtomicBool,
    next_token: AtomicU64,
}

impl SimEpmBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EpmBackend for SimEpmBackend {
    fn init(&self, region: &Region) -> Option<BackendToken> {
        if self.fail.load(Ordering::SeqCst) {
            return None;
        }
        self.inits.fetch_add(1, Ordering::SeqCst);
        // The region must be entirely zero at the moment construction
        // begins.
        let bytes =
            unsafe { std::slice::from_raw_parts(region.vaddr as *const u8, region.byte_len()) };
        if bytes.iter().any(|&b| b != 0) {
            self.saw_nonzero.store(true, Ordering::SeqCst);
        }
        Some(BackendToken(
            self.next_token.fetch_add(1, Ordering::SeqCst) + 1,
        ))
    }

    fn destroy(&self, _state: &EpmState) {
        self.destroys.fetch_add(1, Ordering::SeqCst);
    }
}

/// Recording UTM backend that owns the pages of the states it constructs
#[derive(Default)]
pub struct SimUtmBackend {
    pub backing: Backing,
    pub destroys: AtomicUsize,
    next_token: AtomicU64,
}

impl SimUtmBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a UTM state the way the outer layer would, with pages owned
    /// by this backend
    pub fn construct(&self, order: Order) -> UtmState {
        let vaddr = self.backing.map(1usize << order);
        UtmState {
            token: BackendToken(self.next_token.fetch_add(1, Ordering::SeqCst) + 1),
            pa: vaddr as PhysAddr,
            vaddr,
            order,
        }
    }
}

impl UtmBackend for SimUtmBackend {
    fn destroy(&self, state: &UtmState) {
        self.destroys.fetch_add(1, Ordering::SeqCst);
        self.backing.unmap(state.vaddr, 1usize << state.order);
    }
}

/// Full simulated platform wired into an `EnclaveManager`
pub struct Sim {
    pub contiguous: Arc<SimContiguousAllocator>,
    pub pages: Arc<SimPageAllocator>,
    pub epm: Arc<SimEpmBackend>,
    pub utm: Arc<SimUtmBackend>,
    pub manager: EnclaveManager,
}

impl Sim {
    pub fn new() -> Self {
        Self::with_registry(Arc::new(HandleRegistry::new()))
    }

    pub fn with_registry(registry: Arc<HandleRegistry>) -> Self {
        let contiguous = Arc::new(SimContiguousAllocator::new());
        let pages = Arc::new(SimPageAllocator::new());
        let epm = Arc::new(SimEpmBackend::new());
        let utm = Arc::new(SimUtmBackend::new());
        let manager = EnclaveManager::builder()
            .with_contiguous_allocator(Arc::clone(&contiguous) as Arc<dyn ContiguousAllocator>)
            .with_page_allocator(Arc::clone(&pages) as Arc<dyn PageAllocator>)
            .with_epm_backend(Arc::clone(&epm) as Arc<dyn EpmBackend>)
            .with_utm_backend(Arc::clone(&utm) as Arc<dyn UtmBackend>)
            .with_registry(registry)
            .build()
            .expect("sim manager construction");
        Self {
            contiguous,
            pages,
            epm,
            utm,
            manager,
        }
    }

    /// Pages currently mapped across all simulated allocators
    pub fn outstanding_pages(&self) -> usize {
        self.contiguous.backing.outstanding_pages()
            + self.pages.backing.outstanding_pages()
            + self.utm.backing.outstanding_pages()
    }

    /// Create an enclave and attach a freshly constructed UTM state
    pub fn create_with_utm(&self, min_pages: PageCount, utm_order: Order) -> Arc<Enclave> {
        let enclave = self.manager.create(min_pages).expect("enclave creation");
        enclave
            .attach_utm(self.utm.construct(utm_order))
            .expect("UTM attach on fresh record");
        enclave
    }
}
