/// GpuResource - owning wrapper around one tracked handle

use std::fmt;
use std::sync::Arc;

use crate::graphics_device::ResourceKind;
use crate::resource::{Handle, ResourceRegistry};

/// One reference to a native GL object
///
/// Obtained from `ResourceRegistry::create` / `create_shader` / `adopt`.
/// Cloning adds a reference; dropping removes one. Neither ever calls the
/// native layer, so a `GpuResource` may be dropped on any thread. The object
/// is deleted by the next `ResourceRegistry::sweep` after the last reference
/// is gone.
pub struct GpuResource {
    handle: Handle,
    registry: Arc<ResourceRegistry>,
}

impl GpuResource {
    /// Wrap a handle whose reference the caller has already counted
    pub(crate) fn from_tracked(registry: Arc<ResourceRegistry>, handle: Handle) -> Self {
        Self { handle, registry }
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Raw GL object name
    pub fn id(&self) -> u32 {
        self.handle.id()
    }

    pub fn kind(&self) -> ResourceKind {
        self.handle.kind()
    }

    /// Registry this resource is counted in
    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }
}

impl Clone for GpuResource {
    fn clone(&self) -> Self {
        self.registry.track(self.handle);
        Self {
            handle: self.handle,
            registry: Arc::clone(&self.registry),
        }
    }
}

impl Drop for GpuResource {
    fn drop(&mut self) {
        self.registry.release(self.handle);
    }
}

impl fmt::Debug for GpuResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpuResource")
            .field("handle", &self.handle)
            .field("ref_count", &self.registry.ref_count(self.handle))
            .finish()
    }
}
