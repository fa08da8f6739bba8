/// Shader - one compiled shader stage

use std::sync::Arc;

use crate::error::Result;
use crate::graphics_device::{GlDevice, ShaderStage};
use crate::resource::{GpuResource, ResourceRegistry};
use crate::{engine_debug, engine_warn};

/// A compiled (or failed) shader stage
///
/// A failed compile is not an error: the stage is still returned, with
/// `is_compiled() == false` and the driver log in `info_log()`. Linking a
/// program with such a stage fails without reaching the native link.
#[derive(Debug)]
pub struct Shader {
    resource: GpuResource,
    stage: ShaderStage,
    compiled: bool,
    info_log: String,
}

impl Shader {
    /// Create a stage object and compile `source` into it
    ///
    /// # Errors
    ///
    /// Only if the stage object itself cannot be created (no current
    /// context, native failure). Compile errors are reported through
    /// `is_compiled` / `info_log`.
    pub fn compile(
        registry: &Arc<ResourceRegistry>,
        device: &mut dyn GlDevice,
        stage: ShaderStage,
        source: &str,
    ) -> Result<Self> {
        let resource = registry.create_shader(device, stage)?;
        let compiled = device.compile_shader(resource.id(), source);
        let info_log = device.shader_info_log(resource.id());

        if compiled {
            engine_debug!("galaxy3d::Shader", "{} shader {} compiled", stage, resource.id());
        } else {
            engine_warn!("galaxy3d::Shader", "{} shader {} failed to compile: {}",
                stage, resource.id(), info_log.trim_end());
        }

        Ok(Self { resource, stage, compiled, info_log })
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Compile log reported by the driver (may be empty on success)
    pub fn info_log(&self) -> &str {
        &self.info_log
    }

    /// Raw GL shader name
    pub fn id(&self) -> u32 {
        self.resource.id()
    }

    pub fn resource(&self) -> &GpuResource {
        &self.resource
    }
}
