/// ShaderProgram - linked program with validated uniform and attribute access
///
/// After every successful link the program's active attributes and uniforms
/// are read back from the driver and become the only source of truth for
/// names, types and array sizes. Every uniform write is checked against
/// them first; a mismatching write never reaches the native layer and is
/// recorded as a `Diagnostic` instead.
///
/// ```ignore
/// let mut program = ShaderProgram::new(&registry, &mut device)?;
/// if !program.link(&mut device, &[&vertex, &fragment]) {
///     eprintln!("{}", program.diagnostic_log());
/// }
/// program.set_uniform(&mut device, "u_matrix", Mat4::IDENTITY);
/// program.set_uniform(&mut device, "u_selector", 2i32);
/// program.draw_arrays(&mut device, PrimitiveMode::Triangles, 0, 36)?;
/// ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Error, Result};
use crate::graphics_device::{
    DeviceInfo, GlDevice, GlslType, IndexType, PrimitiveMode, ResourceKind, ScalarKind,
    TextureTarget, UniformData,
};
use crate::resource::{GpuResource, ResourceRegistry};
use crate::shader::{Diagnostic, Shader, UniformValue, VertexLayout};
use crate::{engine_error, engine_info, engine_trace, engine_warn};

// ===== ACTIVE INTERFACE =====

/// One active attribute or uniform of the linked program
#[derive(Debug, Clone, PartialEq)]
pub struct VariableInfo {
    /// Base name (array suffix `[0]` removed)
    pub name: String,
    /// Resolved location
    pub location: u32,
    /// Declared type
    pub ty: GlslType,
    /// Declared array size (1 for non-arrays)
    pub size: i32,
}

/// Active variables in driver order, with a name index
#[derive(Debug, Default)]
struct InterfaceMap {
    entries: Vec<VariableInfo>,
    names: FxHashMap<String, usize>,
}

impl InterfaceMap {
    fn clear(&mut self) {
        self.entries.clear();
        self.names.clear();
    }

    fn insert(&mut self, info: VariableInfo) {
        if self.names.contains_key(&info.name) {
            return;
        }
        self.names.insert(info.name.clone(), self.entries.len());
        self.entries.push(info);
    }

    fn get(&self, name: &str) -> Option<&VariableInfo> {
        self.names.get(name).map(|index| &self.entries[*index])
    }
}

/// `"lights[0]"` and `"lights"` both name the array `lights`
fn base_name(name: &str) -> &str {
    name.strip_suffix("[0]").unwrap_or(name)
}

/// Callback invoked for every recorded diagnostic
pub type DiagnosticObserver = Box<dyn FnMut(&Diagnostic) + Send>;

// ===== SHADER PROGRAM =====

pub struct ShaderProgram {
    resource: GpuResource,
    device_info: DeviceInfo,
    linked: bool,
    generation: u32,
    attributes: InterfaceMap,
    uniforms: InterfaceMap,
    /// Sampler type last bound to each texture unit
    unit_types: FxHashMap<u32, GlslType>,
    /// Compile and link logs, in order
    link_log: Vec<String>,
    /// Distinct diagnostics, in first-seen order
    diagnostics: Vec<Diagnostic>,
    seen: FxHashSet<Diagnostic>,
    rejected_writes: usize,
    observer: Option<DiagnosticObserver>,
}

impl ShaderProgram {
    /// Create an empty, unlinked program object
    ///
    /// The device identification strings are captured here for
    /// `diagnostic_log`.
    pub fn new(registry: &Arc<ResourceRegistry>, device: &mut dyn GlDevice) -> Result<Self> {
        let resource = registry.create(device, ResourceKind::Program)?;
        Ok(Self {
            resource,
            device_info: device.info(),
            linked: false,
            generation: 0,
            attributes: InterfaceMap::default(),
            uniforms: InterfaceMap::default(),
            unit_types: FxHashMap::default(),
            link_log: Vec::new(),
            diagnostics: Vec::new(),
            seen: FxHashSet::default(),
            rejected_writes: 0,
            observer: None,
        })
    }

    /// Raw GL program name
    pub fn id(&self) -> u32 {
        self.resource.id()
    }

    pub fn resource(&self) -> &GpuResource {
        &self.resource
    }

    /// Whether the last link attempt that reached the driver succeeded
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Number of successful links so far
    pub fn generation(&self) -> u32 {
        self.generation
    }

    // ===== LINK =====

    /// Attach `stages`, link, and detach them again
    ///
    /// On success both active-interface maps are discarded and rebuilt from
    /// the driver's reports. On failure they are left exactly as they were
    /// and stay queryable (`attribute`, `uniform`, ...), but the program is
    /// no longer linked: every setter records `UnlinkedProgram` without a
    /// native call, and draws fail, until the next successful link.
    /// Without stages, or with a stage that failed to compile, the native
    /// link is not attempted and the program state is unchanged.
    ///
    /// # Returns
    ///
    /// The link status
    pub fn link(&mut self, device: &mut dyn GlDevice, stages: &[&Shader]) -> bool {
        let program = self.id();

        if stages.is_empty() {
            self.link_log.push("[link] no shader stages given".to_string());
            engine_warn!("galaxy3d::ShaderProgram", "program {}: link without shader stages", program);
            return false;
        }

        for stage in stages {
            let status = if stage.is_compiled() { "compiled" } else { "compile failed" };
            let log = stage.info_log().trim_end();
            if log.is_empty() {
                self.link_log.push(format!("[{} shader {}] {}", stage.stage(), stage.id(), status));
            } else {
                self.link_log.push(format!("[{} shader {}] {}:\n{}", stage.stage(), stage.id(), status, log));
            }
        }

        if let Some(failed) = stages.iter().find(|stage| !stage.is_compiled()) {
            self.link_log.push(format!(
                "[link] skipped: {} shader {} did not compile", failed.stage(), failed.id()
            ));
            engine_warn!("galaxy3d::ShaderProgram",
                "program {}: not linked, {} shader {} did not compile",
                program, failed.stage(), failed.id());
            return false;
        }

        for stage in stages {
            device.attach_shader(program, stage.id());
        }
        let success = device.link_program(program);
        let info_log = device.program_info_log(program);
        for stage in stages {
            device.detach_shader(program, stage.id());
        }

        let info_log = info_log.trim_end();
        let status = if success { "ok" } else { "failed" };
        if info_log.is_empty() {
            self.link_log.push(format!("[link] {}", status));
        } else {
            self.link_log.push(format!("[link] {}:\n{}", status, info_log));
        }

        if !success {
            self.linked = false;
            engine_warn!("galaxy3d::ShaderProgram", "program {}: link failed: {}", program, info_log);
            return false;
        }

        self.rebuild_interface(device);
        self.linked = true;
        self.generation += 1;

        engine_info!("galaxy3d::ShaderProgram",
            "program {} linked (generation {}): {} attribute(s), {} uniform(s)",
            program, self.generation, self.attributes.entries.len(), self.uniforms.entries.len());
        true
    }

    /// Replace both maps with the driver's current active lists
    fn rebuild_interface(&mut self, device: &dyn GlDevice) {
        let program = self.id();
        self.attributes.clear();
        self.uniforms.clear();

        for active in device.active_attributes(program) {
            let base = base_name(&active.name);
            let location = device
                .attribute_location(program, base)
                .or_else(|| device.attribute_location(program, &format!("{}[0]", base)));
            match location {
                Some(location) => self.attributes.insert(VariableInfo {
                    name: base.to_string(),
                    location,
                    ty: active.ty,
                    size: active.size,
                }),
                None => engine_trace!("galaxy3d::ShaderProgram",
                    "program {}: attribute '{}' has no location, skipped", program, active.name),
            }
        }

        for active in device.active_uniforms(program) {
            let base = base_name(&active.name);
            let location = device
                .uniform_location(program, base)
                .or_else(|| device.uniform_location(program, &format!("{}[0]", base)));
            match location {
                Some(location) => self.uniforms.insert(VariableInfo {
                    name: base.to_string(),
                    location,
                    ty: active.ty,
                    size: active.size,
                }),
                None => engine_trace!("galaxy3d::ShaderProgram",
                    "program {}: uniform '{}' has no location, skipped", program, active.name),
            }
        }
    }

    // ===== QUERIES =====

    /// Active attribute by name (`"name[0]"` is accepted for arrays)
    pub fn attribute(&self, name: &str) -> Option<&VariableInfo> {
        self.attributes.get(base_name(name))
    }

    /// Active uniform by name (`"name[0]"` is accepted for arrays)
    pub fn uniform(&self, name: &str) -> Option<&VariableInfo> {
        self.uniforms.get(base_name(name))
    }

    pub fn attributes(&self) -> &[VariableInfo] {
        &self.attributes.entries
    }

    pub fn uniforms(&self) -> &[VariableInfo] {
        &self.uniforms.entries
    }

    // ===== VALIDATED SETTERS =====

    /// Write one value to a non-array uniform
    ///
    /// # Returns
    ///
    /// true if the write was forwarded to the native layer, false if it was
    /// rejected and recorded as a diagnostic
    pub fn set_uniform<T: UniformValue>(&mut self, device: &mut dyn GlDevice, name: &str, value: T) -> bool {
        let Some((location, _)) = self.check_uniform(name, T::TYPE, 1, || format!("{:?}", value)) else {
            return false;
        };
        device.use_program(Some(self.id()));
        device.set_uniform(location, T::TYPE, T::upload(std::slice::from_ref(&value)));
        true
    }

    /// Write a whole uniform array
    ///
    /// `values.len()` must equal the declared array size.
    pub fn set_uniform_array<T: UniformValue>(
        &mut self,
        device: &mut dyn GlDevice,
        name: &str,
        values: &[T],
    ) -> bool {
        let Some((location, _)) = self.check_uniform(name, T::TYPE, values.len(), || format!("{:?}", values)) else {
            return false;
        };
        device.use_program(Some(self.id()));
        device.set_uniform(location, T::TYPE, T::upload(values));
        true
    }

    /// Bind `texture` to `unit` and point the sampler uniform `name` at it
    ///
    /// The sampler must read from `target`. When `unit` previously received
    /// a different sampler type, the bind still happens and an additional
    /// `TextureUnitConflict` diagnostic is recorded.
    pub fn set_texture(
        &mut self,
        device: &mut dyn GlDevice,
        name: &str,
        unit: u32,
        texture: &GpuResource,
        target: TextureTarget,
    ) -> bool {
        if texture.kind() != ResourceKind::Texture {
            self.record(Diagnostic::WrongResourceKind {
                name: base_name(name).to_string(),
                kind: texture.kind(),
            });
            return false;
        }

        let attempted = target.sampler_type();
        let Some((location, declared)) = self.check_uniform(name, attempted, 1, || {
            format!("{} on unit {}", texture.handle(), unit)
        }) else {
            return false;
        };

        device.use_program(Some(self.id()));
        device.set_uniform(location, declared, UniformData::I32(Cow::Owned(vec![unit as i32])));
        device.bind_texture(unit, target, Some(texture.id()));

        if let Some(previous) = self.unit_types.insert(unit, declared) {
            if previous != declared {
                self.record(Diagnostic::TextureUnitConflict {
                    unit,
                    previous,
                    current: declared,
                    name: base_name(name).to_string(),
                });
            }
        }
        true
    }

    /// Validate a write; returns the location and declared type if accepted
    ///
    /// Types match when they are equal, or when both are samplers reading
    /// from the same texture target.
    fn check_uniform(
        &mut self,
        name: &str,
        attempted: GlslType,
        count: usize,
        value: impl FnOnce() -> String,
    ) -> Option<(u32, GlslType)> {
        let name = base_name(name);

        if !self.linked {
            self.record(Diagnostic::UnlinkedProgram {
                name: name.to_string(),
                attempted,
                value: value(),
            });
            return None;
        }

        let Some(info) = self.uniforms.get(name) else {
            self.record(Diagnostic::UnknownName {
                name: name.to_string(),
                attempted,
                value: value(),
            });
            return None;
        };
        let (location, expected, expected_size) = (info.location, info.ty, info.size);

        let type_ok = expected == attempted
            || (attempted.is_sampler() && expected.sampler_target() == attempted.sampler_target());
        if !type_ok {
            self.record(Diagnostic::TypeMismatch {
                name: name.to_string(),
                expected,
                expected_size,
                attempted,
                attempted_size: count,
                value: value(),
            });
            return None;
        }

        if usize::try_from(expected_size).ok() != Some(count) {
            self.record(Diagnostic::SizeMismatch {
                name: name.to_string(),
                expected,
                expected_size,
                attempted_size: count,
                value: value(),
            });
            return None;
        }

        Some((location, expected))
    }

    // ===== VERTEX ATTRIBUTES =====

    /// Attribute slots used by the program (matrices take one slot per column)
    fn active_slots(&self) -> impl Iterator<Item = u32> + '_ {
        self.attributes.entries.iter().flat_map(|attribute| {
            let slots = attribute.ty.attribute_slots() * attribute.size.max(1) as u32;
            attribute.location..attribute.location + slots
        })
    }

    /// Enable exactly the attribute slots the program uses
    pub fn enable_attributes(&self, device: &mut dyn GlDevice) {
        for slot in self.active_slots() {
            device.enable_vertex_attribute(slot);
        }
    }

    /// Disable the slots enabled by `enable_attributes`
    pub fn disable_attributes(&self, device: &mut dyn GlDevice) {
        for slot in self.active_slots() {
            device.disable_vertex_attribute(slot);
        }
    }

    /// Describe `layout` to the bound vertex array, for active attributes only
    ///
    /// Entries the program does not use are skipped. An entry whose storage
    /// cannot feed the declared attribute (integer attribute from float data,
    /// or the reverse) is rejected with a diagnostic.
    ///
    /// # Returns
    ///
    /// The number of attribute pointers set
    pub fn bind_vertex_layout(&mut self, device: &mut dyn GlDevice, layout: &VertexLayout) -> usize {
        let mut bound = 0;
        for entry in layout.entries() {
            let Some(info) = self.attributes.get(&entry.name) else {
                engine_trace!("galaxy3d::ShaderProgram",
                    "program {}: layout entry '{}' is not an active attribute", self.id(), entry.name);
                continue;
            };
            let (location, declared, declared_size) = (info.location, info.ty, info.size);

            let feeds_float = entry.format.scalar_kind() == ScalarKind::Float || entry.normalized;
            let compatible = match declared.scalar_kind() {
                Some(ScalarKind::Float) => feeds_float,
                Some(kind) => !feeds_float && entry.format.scalar_kind() == kind,
                None => false,
            };
            if !compatible {
                self.record(Diagnostic::TypeMismatch {
                    name: entry.name.clone(),
                    expected: declared,
                    expected_size: declared_size,
                    attempted: entry.glsl_type(),
                    attempted_size: 1,
                    value: format!("{:?}{}", entry.format, if entry.normalized { " normalized" } else { "" }),
                });
                continue;
            }

            device.vertex_attribute_pointer(location, entry.format, entry.normalized, layout.stride(), entry.offset);
            bound += 1;
        }
        bound
    }

    // ===== DRAWING =====

    fn ensure_drawable(&self, device: &dyn GlDevice, operation: &str) -> Result<()> {
        if !device.is_context_current() {
            engine_error!("galaxy3d::ShaderProgram", "{}: no GL context current", operation);
            return Err(Error::NoCurrentContext(operation.to_string()));
        }
        if !self.linked {
            engine_error!("galaxy3d::ShaderProgram",
                "{}: program {} is not linked", operation, self.id());
            return Err(Error::InvalidResource(format!(
                "{}: program {} is not linked", operation, self.id()
            )));
        }
        Ok(())
    }

    /// Use the program, enable its attributes, draw, disable them again
    ///
    /// # Errors
    ///
    /// `InvalidResource` if the program is not linked, `NoCurrentContext` if
    /// no context is current. Nothing is sent to the driver in either case.
    pub fn draw_arrays(&self, device: &mut dyn GlDevice, mode: PrimitiveMode, first: u32, count: u32) -> Result<()> {
        self.ensure_drawable(device, "draw_arrays")?;
        device.use_program(Some(self.id()));
        self.enable_attributes(device);
        device.draw_arrays(mode, first, count);
        self.disable_attributes(device);
        Ok(())
    }

    /// Indexed variant of `draw_arrays`; `offset` is in bytes into the bound index buffer
    pub fn draw_elements(
        &self,
        device: &mut dyn GlDevice,
        mode: PrimitiveMode,
        count: u32,
        index_type: IndexType,
        offset: u32,
    ) -> Result<()> {
        self.ensure_drawable(device, "draw_elements")?;
        device.use_program(Some(self.id()));
        self.enable_attributes(device);
        device.draw_elements(mode, count, index_type, offset);
        self.disable_attributes(device);
        Ok(())
    }

    // ===== DIAGNOSTICS =====

    /// Install the callback invoked for every diagnostic (replaces the previous one)
    pub fn set_observer<F>(&mut self, observer: F)
    where
        F: FnMut(&Diagnostic) + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Distinct diagnostics since the program was created, in first-seen order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Total number of rejected writes, duplicates included
    pub fn rejected_writes(&self) -> usize {
        self.rejected_writes
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        engine_warn!("galaxy3d::ShaderProgram", "program {}: {}", self.id(), diagnostic);
        if let Some(observer) = self.observer.as_mut() {
            observer(&diagnostic);
        }
        if diagnostic.is_invalid_set() {
            self.rejected_writes += 1;
        }
        if self.seen.insert(diagnostic.clone()) {
            self.diagnostics.push(diagnostic);
        }
    }

    /// Everything known about this program, as one text blob
    ///
    /// Device identification, every compile and link log, and every
    /// distinct diagnostic.
    pub fn diagnostic_log(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("Device: {}", self.device_info));
        lines.push(format!(
            "Program {} (generation {}, {})",
            self.id(),
            self.generation,
            if self.linked { "linked" } else { "not linked" }
        ));
        lines.extend(self.link_log.iter().cloned());
        if self.diagnostics.is_empty() {
            lines.push("Diagnostics: none".to_string());
        } else {
            lines.push(format!(
                "Diagnostics ({} distinct, {} rejected write(s)):",
                self.diagnostics.len(),
                self.rejected_writes
            ));
            lines.extend(self.diagnostics.iter().map(|d| format!("  - {}", d)));
        }
        lines.join("\n")
    }
}

impl fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("resource", &self.resource)
            .field("linked", &self.linked)
            .field("generation", &self.generation)
            .field("attributes", &self.attributes.entries)
            .field("uniforms", &self.uniforms.entries)
            .field("diagnostics", &self.diagnostics.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
