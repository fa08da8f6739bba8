/// GlDevice trait - the native GL surface consumed by the engine

use crate::error::Result;
use crate::graphics_device::{
    ActiveVariable, BufferFormat, DeviceInfo, GlslType, IndexType, PrimitiveMode,
    ResourceKind, ShaderStage, TextureTarget, UniformData,
};

/// Native GL API as seen by the registry and the shader layer
///
/// Implemented by backend crates (e.g. `GlowDevice`). Every method maps to
/// one native call (or a small fixed group of them); none of them validates
/// its arguments. Validation is the job of `ShaderProgram`, lifetime is the
/// job of `ResourceRegistry`.
///
/// Handles are the raw GL object names (`u32`, never 0).
///
/// The trait is deliberately not `Send`: a GL context is current on one
/// thread, and every call here must happen on that thread.
pub trait GlDevice {
    /// Whether a GL context is current on the calling thread
    fn is_context_current(&self) -> bool;

    /// Vendor / renderer / version strings
    fn info(&self) -> DeviceInfo;

    // ===== OBJECT LIFETIME =====

    /// Generate a new object name of `kind`
    ///
    /// `ResourceKind::Shader` needs a stage: use `create_shader` instead.
    fn create_handle(&mut self, kind: ResourceKind) -> Result<u32>;

    /// Create a shader object for `stage`
    fn create_shader(&mut self, stage: ShaderStage) -> Result<u32>;

    /// Delete an object name of `kind`
    fn delete_handle(&mut self, kind: ResourceKind, handle: u32);

    // ===== COMPILE / LINK =====

    /// Upload `source` and compile; returns the compile status
    fn compile_shader(&mut self, shader: u32, source: &str) -> bool;

    fn shader_info_log(&self, shader: u32) -> String;

    fn attach_shader(&mut self, program: u32, shader: u32);

    fn detach_shader(&mut self, program: u32, shader: u32);

    /// Link `program`; returns the link status
    fn link_program(&mut self, program: u32) -> bool;

    fn program_info_log(&self, program: u32) -> String;

    // ===== INTROSPECTION =====

    /// Active attribute list of the last successful link
    fn active_attributes(&self, program: u32) -> Vec<ActiveVariable>;

    /// Active uniform list of the last successful link
    fn active_uniforms(&self, program: u32) -> Vec<ActiveVariable>;

    fn attribute_location(&self, program: u32, name: &str) -> Option<u32>;

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32>;

    // ===== STATE =====

    fn use_program(&mut self, program: Option<u32>);

    /// Write `data` to the uniform at `location` of the program in use
    ///
    /// `ty` selects the native entry point (`glUniform3fv`,
    /// `glUniformMatrix4fv`, ...); the element count is derived from the
    /// payload length.
    fn set_uniform(&mut self, location: u32, ty: GlslType, data: UniformData<'_>);

    fn enable_vertex_attribute(&mut self, index: u32);

    fn disable_vertex_attribute(&mut self, index: u32);

    /// Describe the vertex attribute at `index` inside the bound array buffer
    fn vertex_attribute_pointer(
        &mut self,
        index: u32,
        format: BufferFormat,
        normalized: bool,
        stride: u32,
        offset: u32,
    );

    /// Bind `texture` to texture unit `unit` (None unbinds)
    fn bind_texture(&mut self, unit: u32, target: TextureTarget, texture: Option<u32>);

    // ===== DRAWING =====

    fn draw_arrays(&mut self, mode: PrimitiveMode, first: u32, count: u32);

    fn draw_elements(&mut self, mode: PrimitiveMode, count: u32, index_type: IndexType, offset: u32);
}
