/*!
# Galaxy 3D Safe GL - glow device

OpenGL implementation of the `GlDevice` trait on top of the `glow` bindings.

The host application creates the context (glutin, SDL, a browser canvas, ...),
loads it into a `glow::Context` and hands it over:

```ignore
use std::sync::Arc;
use galaxy_3d_safe_gl::galaxy3d::resource::ResourceRegistry;
use galaxy_3d_safe_gl_device_glow::{GlowDevice, GlowDeviceConfig};

let gl = unsafe { glow::Context::from_loader_function(|s| loader(s)) };
let mut device = GlowDevice::new(Arc::new(gl), GlowDeviceConfig::default())?;
let registry = ResourceRegistry::new();

// each frame, context current
registry.sweep(&mut device);
```
*/

mod glow_device;
mod glow_types;

pub use glow_device::{GlowDevice, GlowDeviceConfig};
