//! Resource lifetime module
//!
//! Reference-counted native handles with deletion deferred to an explicit sweep.

mod handle;
mod gpu_resource;
mod registry;

pub use handle::Handle;
pub use gpu_resource::GpuResource;
pub use registry::ResourceRegistry;
