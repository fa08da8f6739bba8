/// GlowDevice - glow implementation of the GlDevice trait

use std::num::NonZeroU32;
use std::sync::Arc;

use galaxy_3d_safe_gl::galaxy3d::device::{
    ActiveVariable, BufferFormat, DeviceInfo, GlslType, IndexType, PrimitiveMode, ResourceKind,
    ScalarKind, ShaderStage, TextureTarget, UniformData,
};
use galaxy_3d_safe_gl::galaxy3d::{Error, GlDevice, Result};
use galaxy_3d_safe_gl::{engine_bail, engine_err, engine_error, engine_info, engine_warn};
use glow::HasContext;

use crate::glow_types::{
    buffer_format_to_gl, glsl_type_from_gl, index_type_to_gl, primitive_mode_to_gl,
    shader_stage_to_gl, texture_target_to_gl,
};

/// GlowDevice configuration
#[derive(Debug, Clone)]
pub struct GlowDeviceConfig {
    /// Log source used by this device
    pub label: String,
    /// Whether the context is current on the creating thread
    pub context_current: bool,
}

impl Default for GlowDeviceConfig {
    fn default() -> Self {
        Self {
            label: "galaxy3d::glow".to_string(),
            context_current: true,
        }
    }
}

/// `GlDevice` backed by a `glow::Context`
///
/// glow cannot tell whether its context is current, so the host reports it
/// with `set_context_current` whenever it makes the context current or
/// releases it (window-system integrations such as glutin know this).
pub struct GlowDevice {
    gl: Arc<glow::Context>,
    context_current: bool,
    label: String,
}

impl GlowDevice {
    /// Wrap a loaded context
    ///
    /// # Errors
    ///
    /// `InitializationFailed` if the context is older than OpenGL 3.3 /
    /// OpenGL ES 3.0 (no integer attributes, no `#version 330` shaders).
    pub fn new(gl: Arc<glow::Context>, config: GlowDeviceConfig) -> Result<Self> {
        let version = gl.version();
        let supported = if version.is_embedded {
            version.major >= 3
        } else {
            (version.major, version.minor) >= (3, 3)
        };
        if !supported {
            engine_error!("galaxy3d::glow", "[{}] OpenGL {}.{}{} is not supported (3.3 / ES 3.0 required)",
                config.label, version.major, version.minor, if version.is_embedded { " ES" } else { "" });
            return Err(Error::InitializationFailed(format!(
                "OpenGL {}.{} is not supported", version.major, version.minor
            )));
        }

        let device = Self {
            gl,
            context_current: config.context_current,
            label: config.label,
        };
        engine_info!("galaxy3d::glow", "[{}] GlowDevice created: {}", device.label, device.info());
        Ok(device)
    }

    /// Report whether the context is current on the calling thread
    pub fn set_context_current(&mut self, current: bool) {
        self.context_current = current;
    }

    /// Shared glow context (for host-side calls the engine does not cover)
    pub fn gl(&self) -> &Arc<glow::Context> {
        &self.gl
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Non-zero GL object name, None for 0
fn native(handle: u32) -> Option<NonZeroU32> {
    NonZeroU32::new(handle)
}

impl GlDevice for GlowDevice {
    fn is_context_current(&self) -> bool {
        self.context_current
    }

    fn info(&self) -> DeviceInfo {
        unsafe {
            DeviceInfo {
                vendor: self.gl.get_parameter_string(glow::VENDOR),
                renderer: self.gl.get_parameter_string(glow::RENDERER),
                version: self.gl.get_parameter_string(glow::VERSION),
                shading_language_version: self.gl.get_parameter_string(glow::SHADING_LANGUAGE_VERSION),
            }
        }
    }

    // ===== OBJECT LIFETIME =====

    fn create_handle(&mut self, kind: ResourceKind) -> Result<u32> {
        let gl = &self.gl;
        let created = unsafe {
            match kind {
                ResourceKind::Buffer => gl.create_buffer().map(|name| name.0),
                ResourceKind::Texture => gl.create_texture().map(|name| name.0),
                ResourceKind::VertexArray => gl.create_vertex_array().map(|name| name.0),
                ResourceKind::Framebuffer => gl.create_framebuffer().map(|name| name.0),
                ResourceKind::Renderbuffer => gl.create_renderbuffer().map(|name| name.0),
                ResourceKind::Sampler => gl.create_sampler().map(|name| name.0),
                ResourceKind::Query => gl.create_query().map(|name| name.0),
                ResourceKind::Program => gl.create_program().map(|name| name.0),
                ResourceKind::Shader => {
                    engine_bail!("galaxy3d::glow", "[{}] shader objects need a stage: use create_shader", self.label);
                }
            }
        };
        created
            .map(NonZeroU32::get)
            .map_err(|e| engine_err!("galaxy3d::glow", "[{}] Failed to create {}: {}", self.label, kind, e))
    }

    fn create_shader(&mut self, stage: ShaderStage) -> Result<u32> {
        unsafe { self.gl.create_shader(shader_stage_to_gl(stage)) }
            .map(|shader| shader.0.get())
            .map_err(|e| engine_err!("galaxy3d::glow", "[{}] Failed to create {} shader: {}", self.label, stage, e))
    }

    fn delete_handle(&mut self, kind: ResourceKind, handle: u32) {
        let Some(name) = native(handle) else {
            engine_warn!("galaxy3d::glow", "[{}] delete of {} 0 ignored", self.label, kind);
            return;
        };
        let gl = &self.gl;
        unsafe {
            match kind {
                ResourceKind::Buffer => gl.delete_buffer(glow::NativeBuffer(name)),
                ResourceKind::Texture => gl.delete_texture(glow::NativeTexture(name)),
                ResourceKind::VertexArray => gl.delete_vertex_array(glow::NativeVertexArray(name)),
                ResourceKind::Framebuffer => gl.delete_framebuffer(glow::NativeFramebuffer(name)),
                ResourceKind::Renderbuffer => gl.delete_renderbuffer(glow::NativeRenderbuffer(name)),
                ResourceKind::Sampler => gl.delete_sampler(glow::NativeSampler(name)),
                ResourceKind::Query => gl.delete_query(glow::NativeQuery(name)),
                ResourceKind::Shader => gl.delete_shader(glow::NativeShader(name)),
                ResourceKind::Program => gl.delete_program(glow::NativeProgram(name)),
            }
        }
    }

    // ===== COMPILE / LINK =====

    fn compile_shader(&mut self, shader: u32, source: &str) -> bool {
        let Some(shader) = native(shader).map(glow::NativeShader) else {
            return false;
        };
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            self.gl.get_shader_compile_status(shader)
        }
    }

    fn shader_info_log(&self, shader: u32) -> String {
        native(shader)
            .map(|name| unsafe { self.gl.get_shader_info_log(glow::NativeShader(name)) })
            .unwrap_or_default()
    }

    fn attach_shader(&mut self, program: u32, shader: u32) {
        if let (Some(program), Some(shader)) = (native(program), native(shader)) {
            unsafe { self.gl.attach_shader(glow::NativeProgram(program), glow::NativeShader(shader)) };
        }
    }

    fn detach_shader(&mut self, program: u32, shader: u32) {
        if let (Some(program), Some(shader)) = (native(program), native(shader)) {
            unsafe { self.gl.detach_shader(glow::NativeProgram(program), glow::NativeShader(shader)) };
        }
    }

    fn link_program(&mut self, program: u32) -> bool {
        let Some(program) = native(program).map(glow::NativeProgram) else {
            return false;
        };
        unsafe {
            self.gl.link_program(program);
            self.gl.get_program_link_status(program)
        }
    }

    fn program_info_log(&self, program: u32) -> String {
        native(program)
            .map(|name| unsafe { self.gl.get_program_info_log(glow::NativeProgram(name)) })
            .unwrap_or_default()
    }

    // ===== INTROSPECTION =====

    fn active_attributes(&self, program: u32) -> Vec<ActiveVariable> {
        let Some(program) = native(program).map(glow::NativeProgram) else {
            return Vec::new();
        };
        unsafe {
            let count = self.gl.get_active_attributes(program);
            (0..count)
                .filter_map(|index| self.gl.get_active_attribute(program, index))
                .map(|attribute| ActiveVariable {
                    name: attribute.name,
                    ty: glsl_type_from_gl(attribute.atype),
                    size: attribute.size,
                })
                .collect()
        }
    }

    fn active_uniforms(&self, program: u32) -> Vec<ActiveVariable> {
        let Some(program) = native(program).map(glow::NativeProgram) else {
            return Vec::new();
        };
        unsafe {
            let count = self.gl.get_active_uniforms(program);
            (0..count)
                .filter_map(|index| self.gl.get_active_uniform(program, index))
                .map(|uniform| ActiveVariable {
                    name: uniform.name,
                    ty: glsl_type_from_gl(uniform.utype),
                    size: uniform.size,
                })
                .collect()
        }
    }

    fn attribute_location(&self, program: u32, name: &str) -> Option<u32> {
        let program = native(program).map(glow::NativeProgram)?;
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        let program = native(program).map(glow::NativeProgram)?;
        unsafe { self.gl.get_uniform_location(program, name) }.map(|location| location.0)
    }

    // ===== STATE =====

    fn use_program(&mut self, program: Option<u32>) {
        let program = program.and_then(native).map(glow::NativeProgram);
        unsafe { self.gl.use_program(program) };
    }

    fn set_uniform(&mut self, location: u32, ty: GlslType, data: UniformData<'_>) {
        let location = glow::NativeUniformLocation(location);
        let location = Some(&location);
        let gl = &self.gl;
        unsafe {
            match &data {
                UniformData::F32(values) => match ty {
                    GlslType::Mat2 => gl.uniform_matrix_2_f32_slice(location, false, values),
                    GlslType::Mat3 => gl.uniform_matrix_3_f32_slice(location, false, values),
                    GlslType::Mat4 => gl.uniform_matrix_4_f32_slice(location, false, values),
                    _ => match ty.components() {
                        1 => gl.uniform_1_f32_slice(location, values),
                        2 => gl.uniform_2_f32_slice(location, values),
                        3 => gl.uniform_3_f32_slice(location, values),
                        _ => gl.uniform_4_f32_slice(location, values),
                    },
                },
                // int, bool and sampler uniforms all go through glUniform*iv
                UniformData::I32(values) => match ty.components() {
                    1 => gl.uniform_1_i32_slice(location, values),
                    2 => gl.uniform_2_i32_slice(location, values),
                    3 => gl.uniform_3_i32_slice(location, values),
                    _ => gl.uniform_4_i32_slice(location, values),
                },
                UniformData::U32(values) => match ty.components() {
                    1 => gl.uniform_1_u32_slice(location, values),
                    2 => gl.uniform_2_u32_slice(location, values),
                    3 => gl.uniform_3_u32_slice(location, values),
                    _ => gl.uniform_4_u32_slice(location, values),
                },
            }
        }
    }

    fn enable_vertex_attribute(&mut self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) };
    }

    fn disable_vertex_attribute(&mut self, index: u32) {
        unsafe { self.gl.disable_vertex_attrib_array(index) };
    }

    fn vertex_attribute_pointer(
        &mut self,
        index: u32,
        format: BufferFormat,
        normalized: bool,
        stride: u32,
        offset: u32,
    ) {
        let (size, data_type) = buffer_format_to_gl(format);
        unsafe {
            if format.scalar_kind() == ScalarKind::Float || normalized {
                self.gl.vertex_attrib_pointer_f32(index, size, data_type, normalized, stride as i32, offset as i32);
            } else {
                // Integer attributes keep their integer values
                self.gl.vertex_attrib_pointer_i32(index, size, data_type, stride as i32, offset as i32);
            }
        }
    }

    fn bind_texture(&mut self, unit: u32, target: TextureTarget, texture: Option<u32>) {
        let texture = texture.and_then(native).map(glow::NativeTexture);
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(texture_target_to_gl(target), texture);
        }
    }

    // ===== DRAWING =====

    fn draw_arrays(&mut self, mode: PrimitiveMode, first: u32, count: u32) {
        unsafe { self.gl.draw_arrays(primitive_mode_to_gl(mode), first as i32, count as i32) };
    }

    fn draw_elements(&mut self, mode: PrimitiveMode, count: u32, index_type: IndexType, offset: u32) {
        unsafe {
            self.gl.draw_elements(
                primitive_mode_to_gl(mode),
                count as i32,
                index_type_to_gl(index_type),
                offset as i32,
            )
        };
    }
}
