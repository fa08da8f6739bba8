/// Mock GL device for unit tests (no GPU required)
///
/// Records every state-changing native call so tests can assert exact call
/// sequences ("zero native calls", "exactly one delete"). Link results are
/// scripted per program with `script_link`.

use rustc_hash::FxHashMap;

use crate::engine_bail;
use crate::error::Result;
use crate::graphics_device::{
    ActiveVariable, BufferFormat, DeviceInfo, GlDevice, GlslType, IndexType, PrimitiveMode,
    ResourceKind, ShaderStage, TextureTarget, UniformData,
};

// ============================================================================
// Recorded calls
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateHandle(ResourceKind, u32),
    CreateShader(ShaderStage, u32),
    DeleteHandle(ResourceKind, u32),
    CompileShader(u32),
    AttachShader { program: u32, shader: u32 },
    DetachShader { program: u32, shader: u32 },
    LinkProgram(u32),
    UseProgram(Option<u32>),
    SetUniform { location: u32, ty: GlslType, data: UniformData<'static> },
    EnableVertexAttribute(u32),
    DisableVertexAttribute(u32),
    VertexAttributePointer { index: u32, format: BufferFormat, normalized: bool, stride: u32, offset: u32 },
    BindTexture { unit: u32, target: TextureTarget, texture: Option<u32> },
    DrawArrays { mode: PrimitiveMode, first: u32, count: u32 },
    DrawElements { mode: PrimitiveMode, count: u32, index_type: IndexType, offset: u32 },
}

// ============================================================================
// Scripted link results
// ============================================================================

/// What the next `link_program` call on a program reports
#[derive(Debug, Clone)]
pub struct MockLink {
    pub success: bool,
    pub log: String,
    pub attributes: Vec<ActiveVariable>,
    pub uniforms: Vec<ActiveVariable>,
}

impl MockLink {
    pub fn ok(attributes: Vec<ActiveVariable>, uniforms: Vec<ActiveVariable>) -> Self {
        Self { success: true, log: String::new(), attributes, uniforms }
    }

    pub fn failed(log: &str) -> Self {
        Self { success: false, log: log.to_string(), attributes: Vec::new(), uniforms: Vec::new() }
    }
}

/// Shorthand for an `ActiveVariable`
pub fn active(name: &str, ty: GlslType, size: i32) -> ActiveVariable {
    ActiveVariable { name: name.to_string(), ty, size }
}

#[derive(Debug, Default)]
struct MockProgram {
    pending: Option<MockLink>,
    attributes: Vec<ActiveVariable>,
    uniforms: Vec<ActiveVariable>,
    log: String,
    values: FxHashMap<u32, UniformData<'static>>,
}

// ============================================================================
// Mock device
// ============================================================================

#[derive(Debug)]
pub struct MockGlDevice {
    /// Reported by `is_context_current`
    pub context_current: bool,
    /// Make every handle generation fail
    pub fail_create: bool,
    /// Every state-changing call, in order
    pub calls: Vec<GlCall>,
    next_handle: u32,
    programs: FxHashMap<u32, MockProgram>,
    shader_logs: FxHashMap<u32, String>,
    current_program: Option<u32>,
}

impl MockGlDevice {
    pub fn new() -> Self {
        Self {
            context_current: true,
            fail_create: false,
            calls: Vec::new(),
            next_handle: 1,
            programs: FxHashMap::default(),
            shader_logs: FxHashMap::default(),
            current_program: None,
        }
    }

    /// Script the result of the next link of `program`
    pub fn script_link(&mut self, program: u32, link: MockLink) {
        self.programs.entry(program).or_default().pending = Some(link);
    }

    /// Drain recorded calls
    pub fn take_calls(&mut self) -> Vec<GlCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of deletes issued for one handle
    pub fn delete_count(&self, kind: ResourceKind, handle: u32) -> usize {
        self.calls
            .iter()
            .filter(|call| **call == GlCall::DeleteHandle(kind, handle))
            .count()
    }

    /// All deletes, in order
    pub fn deleted(&self) -> Vec<(ResourceKind, u32)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                GlCall::DeleteHandle(kind, handle) => Some((*kind, *handle)),
                _ => None,
            })
            .collect()
    }

    /// Last value written to `location` of `program`
    pub fn uniform_value(&self, program: u32, location: u32) -> Option<&UniformData<'static>> {
        self.programs.get(&program).and_then(|p| p.values.get(&location))
    }

    fn next(&mut self) -> u32 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }
}

impl GlDevice for MockGlDevice {
    fn is_context_current(&self) -> bool {
        self.context_current
    }

    fn info(&self) -> DeviceInfo {
        DeviceInfo {
            vendor: "Galaxy3D".to_string(),
            renderer: "MockGlDevice".to_string(),
            version: "3.3 (mock)".to_string(),
            shading_language_version: "3.30".to_string(),
        }
    }

    fn create_handle(&mut self, kind: ResourceKind) -> Result<u32> {
        if self.fail_create {
            engine_bail!("galaxy3d::mock", "create {}: out of names", kind);
        }
        if kind == ResourceKind::Shader {
            engine_bail!("galaxy3d::mock", "create_handle(Shader): use create_shader");
        }
        let id = self.next();
        if kind == ResourceKind::Program {
            self.programs.entry(id).or_default();
        }
        self.calls.push(GlCall::CreateHandle(kind, id));
        Ok(id)
    }

    fn create_shader(&mut self, stage: ShaderStage) -> Result<u32> {
        if self.fail_create {
            engine_bail!("galaxy3d::mock", "create {} shader: out of names", stage);
        }
        let id = self.next();
        self.calls.push(GlCall::CreateShader(stage, id));
        Ok(id)
    }

    fn delete_handle(&mut self, kind: ResourceKind, handle: u32) {
        self.calls.push(GlCall::DeleteHandle(kind, handle));
    }

    fn compile_shader(&mut self, shader: u32, source: &str) -> bool {
        self.calls.push(GlCall::CompileShader(shader));
        if source.contains("#error") {
            self.shader_logs.insert(shader, "0:1(1): error: #error directive".to_string());
            false
        } else {
            self.shader_logs.insert(shader, String::new());
            true
        }
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.shader_logs.get(&shader).cloned().unwrap_or_default()
    }

    fn attach_shader(&mut self, program: u32, shader: u32) {
        self.calls.push(GlCall::AttachShader { program, shader });
    }

    fn detach_shader(&mut self, program: u32, shader: u32) {
        self.calls.push(GlCall::DetachShader { program, shader });
    }

    fn link_program(&mut self, program: u32) -> bool {
        self.calls.push(GlCall::LinkProgram(program));
        let state = self.programs.entry(program).or_default();
        let link = state.pending.take().unwrap_or_else(|| MockLink::ok(Vec::new(), Vec::new()));
        state.log = link.log;
        if link.success {
            state.attributes = link.attributes;
            state.uniforms = link.uniforms;
            state.values.clear();
        }
        link.success
    }

    fn program_info_log(&self, program: u32) -> String {
        self.programs.get(&program).map(|p| p.log.clone()).unwrap_or_default()
    }

    fn active_attributes(&self, program: u32) -> Vec<ActiveVariable> {
        self.programs.get(&program).map(|p| p.attributes.clone()).unwrap_or_default()
    }

    fn active_uniforms(&self, program: u32) -> Vec<ActiveVariable> {
        self.programs.get(&program).map(|p| p.uniforms.clone()).unwrap_or_default()
    }

    fn attribute_location(&self, program: u32, name: &str) -> Option<u32> {
        // Locations are packed in declaration order, matrices take one slot per column
        let program = self.programs.get(&program)?;
        let mut location = 0;
        for attribute in &program.attributes {
            if attribute.name.starts_with("gl_") {
                continue;
            }
            if attribute.name == name {
                return Some(location);
            }
            location += attribute.ty.attribute_slots() * attribute.size.max(1) as u32;
        }
        None
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        // Exact match on the reported name only, like a driver that reports "name[0]"
        // and is strict about the lookup. Block members have no location.
        let program = self.programs.get(&program)?;
        if name.contains('.') {
            return None;
        }
        program
            .uniforms
            .iter()
            .position(|uniform| uniform.name == name)
            .map(|index| index as u32 * 16)
    }

    fn use_program(&mut self, program: Option<u32>) {
        self.current_program = program;
        self.calls.push(GlCall::UseProgram(program));
    }

    fn set_uniform(&mut self, location: u32, ty: GlslType, data: UniformData<'_>) {
        let data = data.into_owned();
        if let Some(program) = self.current_program {
            self.programs
                .entry(program)
                .or_default()
                .values
                .insert(location, data.clone());
        }
        self.calls.push(GlCall::SetUniform { location, ty, data });
    }

    fn enable_vertex_attribute(&mut self, index: u32) {
        self.calls.push(GlCall::EnableVertexAttribute(index));
    }

    fn disable_vertex_attribute(&mut self, index: u32) {
        self.calls.push(GlCall::DisableVertexAttribute(index));
    }

    fn vertex_attribute_pointer(
        &mut self,
        index: u32,
        format: BufferFormat,
        normalized: bool,
        stride: u32,
        offset: u32,
    ) {
        self.calls.push(GlCall::VertexAttributePointer { index, format, normalized, stride, offset });
    }

    fn bind_texture(&mut self, unit: u32, target: TextureTarget, texture: Option<u32>) {
        self.calls.push(GlCall::BindTexture { unit, target, texture });
    }

    fn draw_arrays(&mut self, mode: PrimitiveMode, first: u32, count: u32) {
        self.calls.push(GlCall::DrawArrays { mode, first, count });
    }

    fn draw_elements(&mut self, mode: PrimitiveMode, count: u32, index_type: IndexType, offset: u32) {
        self.calls.push(GlCall::DrawElements { mode, count, index_type, offset });
    }
}
