/*!
# Galaxy 3D Safe GL

Safety layer between application code and a stateful OpenGL context.

Two problems are handled here:

- **Resource lifetime**: native objects may only be deleted with a context
  current, but Rust values are dropped wherever their owner goes out of
  scope. `GpuResource` drops only decrement a count in the
  `ResourceRegistry`; native deletes happen in `ResourceRegistry::sweep`,
  which the host calls at a safe point.
- **Shader interface safety**: `ShaderProgram` reads the active attributes
  and uniforms back after every successful link and checks every uniform
  write against them. Mismatches never reach the driver; they are recorded
  as diagnostics. `shader_gen` builds complete shader sources from
  declarative attribute descriptors.

## Architecture

- **GlDevice**: native GL surface (implemented by backend crates)
- **ResourceRegistry / GpuResource**: reference counts and deferred sweep
- **Shader / ShaderProgram**: compile, link, introspect, validated setters
- **shader_gen**: attribute-visualization and texture shader generation
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod resource;
pub mod shader;
pub mod shader_gen;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Native device trait
    pub use crate::graphics_device::GlDevice;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{format_entry, DefaultLogger, LogEntry, LogSeverity, Logger};
    }

    // Device sub-module with the value types exchanged with backends
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Shader sub-module
    pub mod shader {
        pub use crate::shader::*;
    }

    // Shader generation sub-module
    pub mod shader_gen {
        pub use crate::shader_gen::*;
    }
}

// Re-export math library at crate root
pub use glam;
