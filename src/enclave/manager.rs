/*!
 * Enclave Lifecycle Manager
 *
 * Orchestrates enclave creation (region acquisition, then EPM construction)
 * and idempotent, presence-checked destruction. Creation rolls back from
 * any point of partial initialization, so callers never clean up a
 * partially constructed record themselves.
 */

use super::record::Enclave;
use super::traits::{EpmBackend, UtmBackend};
use super::types::{EnclaveError, EnclaveResult, EpmState};
use crate::core::types::{Handle, PageCount};
use crate::memory::{ContiguousAllocator, EnclaveLayout, PageAllocator, RegionAllocator};
use crate::registry::HandleRegistry;
use log::{debug, error, info};
use std::sync::Arc;

/// Enclave lifecycle manager
pub struct EnclaveManager {
    regions: Arc<RegionAllocator>,
    epm_backend: Arc<dyn EpmBackend>,
    utm_backend: Arc<dyn UtmBackend>,
    registry: Arc<HandleRegistry>,
}

impl std::fmt::Debug for EnclaveManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnclaveManager").finish_non_exhaustive()
    }
}

impl EnclaveManager {
    pub fn builder() -> EnclaveManagerBuilder {
        EnclaveManagerBuilder::new()
    }

    /// Handle registry this manager publishes records into
    pub fn registry(&self) -> Arc<HandleRegistry> {
        Arc::clone(&self.registry)
    }

    /// Region allocator backing this manager's enclaves
    pub fn regions(&self) -> Arc<RegionAllocator> {
        Arc::clone(&self.regions)
    }

    /// Create an enclave backed by at least `min_pages` pages
    ///
    /// The record starts with both sub-states absent and an empty mailbox;
    /// the region is acquired, zero-filled, and handed to EPM construction.
    /// The returned record is not yet visible in the handle registry; call
    /// `register` to publish it.
    pub fn create(&self, min_pages: PageCount) -> EnclaveResult<Arc<Enclave>> {
        let enclave = Arc::new(Enclave::new());

        let region = match self.regions.allocate(min_pages) {
            Ok(region) => region,
            Err(e) => {
                error!("enclave creation failed: {}", e);
                // Nothing attached yet; destroy still runs the full
                // presence-checked teardown on the empty record.
                let _ = self.destroy(Some(Arc::clone(&enclave)));
                return Err(e.into());
            }
        };

        let pa = region.pa;
        match self.epm_backend.init(&region) {
            Some(token) => {
                enclave.inner.lock().epm = Some(EpmState { token, region });
            }
            None => {
                error!("EPM construction failed over region at {:#x}", pa);
                // The region was never attached to the record, so it is
                // released here before the record is rolled back.
                self.regions.release(region);
                let _ = self.destroy(Some(Arc::clone(&enclave)));
                return Err(EnclaveError::EpmInitFailed { pa });
            }
        }

        debug!("enclave created: EPM region at {:#x}", pa);
        Ok(enclave)
    }

    /// Create an enclave sized for the given layout
    pub fn create_sized(&self, layout: &EnclaveLayout) -> EnclaveResult<Arc<Enclave>> {
        self.create(layout.required_pages())
    }

    /// Publish a record in the handle registry
    ///
    /// On handle exhaustion the record stays unregistered and the caller
    /// keeps ownership (and the duty to destroy it).
    pub fn register(&self, enclave: Arc<Enclave>) -> EnclaveResult<Handle> {
        let handle = self.registry.insert(enclave)?;
        info!("enclave registered under handle {:#x}", handle);
        Ok(handle)
    }

    /// Tear down a record, tolerating any partially initialized state
    ///
    /// EPM and UTM are torn down independently when present: the EPM
    /// backend is destroyed and its region released; the UTM backend is
    /// destroyed (it owns its own pages). `None` and a record that was
    /// already destroyed both fail with `InvalidRecord`. After a
    /// successful destroy the record must not be reused.
    pub fn destroy(&self, enclave: Option<Arc<Enclave>>) -> EnclaveResult<()> {
        let enclave = enclave.ok_or(EnclaveError::InvalidRecord)?;

        let (epm, utm) = {
            let mut inner = enclave.inner.lock();
            if inner.destroyed {
                return Err(EnclaveError::InvalidRecord);
            }
            inner.destroyed = true;
            (inner.epm.take(), inner.utm.take())
        };

        if let Some(epm) = epm {
            self.epm_backend.destroy(&epm);
            self.regions.release(epm.region);
        }
        if let Some(utm) = utm {
            self.utm_backend.destroy(&utm);
        }

        debug!("enclave destroyed");
        Ok(())
    }

    /// Remove a handle from the registry and destroy its record
    ///
    /// The registry entry is removed before teardown begins, so concurrent
    /// lookups never observe a record mid-teardown.
    pub fn destroy_by_handle(&self, handle: Handle) -> EnclaveResult<()> {
        let record = self.registry.remove(handle);
        if record.is_none() {
            return Err(EnclaveError::InvalidRecord);
        }
        self.destroy(record)
    }
}

impl Clone for EnclaveManager {
    fn clone(&self) -> Self {
        Self {
            regions: Arc::clone(&self.regions),
            epm_backend: Arc::clone(&self.epm_backend),
            utm_backend: Arc::clone(&self.utm_backend),
            registry: Arc::clone(&self.registry),
        }
    }
}

/// Builder for `EnclaveManager`
///
/// The page allocator and both backends are required; the contiguous
/// allocator is optional (platforms without a contiguous reservation pool
/// run on the fallback alone) and a fresh registry is created when none is
/// injected.
pub struct EnclaveManagerBuilder {
    contiguous: Option<Arc<dyn ContiguousAllocator>>,
    pages: Option<Arc<dyn PageAllocator>>,
    epm_backend: Option<Arc<dyn EpmBackend>>,
    utm_backend: Option<Arc<dyn UtmBackend>>,
    registry: Option<Arc<HandleRegistry>>,
}

impl EnclaveManagerBuilder {
    pub fn new() -> Self {
        Self {
            contiguous: None,
            pages: None,
            epm_backend: None,
            utm_backend: None,
            registry: None,
        }
    }

    #[must_use]
    pub fn with_contiguous_allocator(mut self, contiguous: Arc<dyn ContiguousAllocator>) -> Self {
        self.contiguous = Some(contiguous);
        self
    }

    #[must_use]
    pub fn with_page_allocator(mut self, pages: Arc<dyn PageAllocator>) -> Self {
        self.pages = Some(pages);
        self
    }

    #[must_use]
    pub fn with_epm_backend(mut self, backend: Arc<dyn EpmBackend>) -> Self {
        self.epm_backend = Some(backend);
        self
    }

    #[must_use]
    pub fn with_utm_backend(mut self, backend: Arc<dyn UtmBackend>) -> Self {
        self.utm_backend = Some(backend);
        self
    }

    #[must_use]
    pub fn with_registry(mut self, registry: Arc<HandleRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> EnclaveResult<EnclaveManager> {
        let pages = self
            .pages
            .ok_or(EnclaveError::Misconfigured("page allocator"))?;
        let epm_backend = self
            .epm_backend
            .ok_or(EnclaveError::Misconfigured("EPM backend"))?;
        let utm_backend = self
            .utm_backend
            .ok_or(EnclaveError::Misconfigured("UTM backend"))?;

        let mut regions = RegionAllocator::new(pages);
        let has_contiguous = self.contiguous.is_some();
        if let Some(contiguous) = self.contiguous {
            regions = regions.with_contiguous(contiguous);
        }

        info!(
            "enclave manager initialized (contiguous allocator: {})",
            if has_contiguous { "present" } else { "absent" }
        );
        Ok(EnclaveManager {
            regions: Arc::new(regions),
            epm_backend,
            utm_backend,
            registry: self.registry.unwrap_or_default(),
        })
    }
}

impl Default for EnclaveManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
