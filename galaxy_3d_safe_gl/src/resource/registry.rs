/// ResourceRegistry - reference counts for native GL handles, with deferred deletion
///
/// Native GL objects may only be deleted while a context is current on the
/// calling thread. A `GpuResource` can be dropped anywhere (worker thread,
/// another owner's destructor, ...), so dropping only decrements a count
/// here. The objects themselves are deleted by `sweep`, which the host calls
/// at a point where the context is known to be current (typically once per
/// frame).
///
/// ```ignore
/// let registry = ResourceRegistry::new();
/// let vbo = registry.create(&mut device, ResourceKind::Buffer)?;
/// drop(vbo);                       // count 1 -> 0, nothing deleted yet
/// registry.sweep(&mut device);     // glDeleteBuffers happens here
/// ```

use std::sync::{Arc, Mutex, MutexGuard};

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graphics_device::{GlDevice, ResourceKind, ShaderStage};
use crate::resource::{GpuResource, Handle};
use crate::{engine_debug, engine_trace, engine_warn};

/// Reference counts of every tracked handle, one map per resource kind
pub struct ResourceRegistry {
    counts: [Mutex<FxHashMap<u32, u32>>; ResourceKind::COUNT],
}

impl ResourceRegistry {
    /// Create an empty registry, shared between the render thread and droppers
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            counts: std::array::from_fn(|_| Mutex::new(FxHashMap::default())),
        })
    }

    /// Map of one kind
    ///
    /// Poisoning is ignored: the maps hold plain integers and every update
    /// is a single insert/decrement, so a panicking holder cannot leave one
    /// half-written.
    fn map(&self, kind: ResourceKind) -> MutexGuard<'_, FxHashMap<u32, u32>> {
        self.counts[kind as usize]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ===== CREATION =====

    /// Generate a native object of `kind` and return its tracked wrapper
    ///
    /// # Errors
    ///
    /// - `NoCurrentContext` if no context is current
    /// - any error reported by the device while generating the name
    pub fn create(self: &Arc<Self>, device: &mut dyn GlDevice, kind: ResourceKind) -> Result<GpuResource> {
        if !device.is_context_current() {
            return Err(Error::NoCurrentContext(format!("create {}", kind)));
        }
        let id = device.create_handle(kind)?;
        Ok(self.adopt(Handle::new(kind, id)))
    }

    /// Create a shader object for `stage` and return its tracked wrapper
    pub fn create_shader(self: &Arc<Self>, device: &mut dyn GlDevice, stage: ShaderStage) -> Result<GpuResource> {
        if !device.is_context_current() {
            return Err(Error::NoCurrentContext(format!("create {} shader", stage)));
        }
        let id = device.create_shader(stage)?;
        Ok(self.adopt(Handle::new(ResourceKind::Shader, id)))
    }

    /// Take ownership of a handle generated outside the registry
    ///
    /// The returned wrapper counts as one reference, exactly like `create`.
    pub fn adopt(self: &Arc<Self>, handle: Handle) -> GpuResource {
        self.track(handle);
        engine_trace!("galaxy3d::ResourceRegistry", "tracking {}", handle);
        GpuResource::from_tracked(Arc::clone(self), handle)
    }

    // ===== COUNTING =====

    /// Register `handle` at count 1, or add one reference if already tracked
    pub fn track(&self, handle: Handle) {
        let mut map = self.map(handle.kind());
        let count = map.entry(handle.id()).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Drop one reference to `handle`
    ///
    /// Never goes below zero. Unknown handles and handles already at zero
    /// (or already swept) are ignored. Safe to call from any thread.
    pub fn release(&self, handle: Handle) {
        let mut map = self.map(handle.kind());
        if let Some(count) = map.get_mut(&handle.id()) {
            *count = count.saturating_sub(1);
        }
    }

    // ===== SWEEP =====

    /// Delete every handle whose count is zero
    ///
    /// Must be called with a context current on the calling thread; if the
    /// device reports none, nothing is deleted and the handles stay pending.
    ///
    /// Each zero-count entry is removed from its map under the map lock
    /// first, and only removed entries are deleted. A concurrent `release`
    /// of the same handle then finds no entry and does nothing, so every
    /// handle is deleted exactly once.
    ///
    /// # Returns
    ///
    /// The number of native deletes issued
    pub fn sweep(&self, device: &mut dyn GlDevice) -> usize {
        if !device.is_context_current() {
            engine_warn!("galaxy3d::ResourceRegistry",
                "sweep skipped: no GL context current ({} handle(s) pending)",
                self.pending_count());
            return 0;
        }

        let mut deleted = 0;
        for kind in ResourceKind::ALL {
            let mut doomed = Vec::new();
            self.map(kind).retain(|id, count| {
                if *count == 0 {
                    doomed.push(*id);
                    false
                } else {
                    true
                }
            });

            for id in doomed {
                device.delete_handle(kind, id);
                deleted += 1;
            }
        }

        if deleted > 0 {
            engine_debug!("galaxy3d::ResourceRegistry", "swept {} handle(s)", deleted);
        }
        deleted
    }

    // ===== QUERIES =====

    /// Current count of `handle`, None if untracked (never created or already swept)
    pub fn ref_count(&self, handle: Handle) -> Option<u32> {
        self.map(handle.kind()).get(&handle.id()).copied()
    }

    /// Handles of `kind` that still have at least one reference
    pub fn live_count(&self, kind: ResourceKind) -> usize {
        self.map(kind).values().filter(|count| **count > 0).count()
    }

    /// Handles at zero, waiting for the next sweep
    pub fn pending_count(&self) -> usize {
        ResourceKind::ALL
            .iter()
            .map(|kind| self.map(*kind).values().filter(|count| **count == 0).count())
            .sum()
    }

    /// All tracked handles, live or pending
    pub fn tracked_count(&self) -> usize {
        ResourceKind::ALL.iter().map(|kind| self.map(*kind).len()).sum()
    }
}

impl Drop for ResourceRegistry {
    fn drop(&mut self) {
        // No context can be assumed here: whatever was never swept leaks
        let leaked = self.tracked_count();
        if leaked > 0 {
            engine_warn!("galaxy3d::ResourceRegistry",
                "registry dropped with {} unswept handle(s); they are leaked", leaked);
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
