//! Integration tests for Shader / ShaderProgram with hand-written GLSL
//!
//! No GPU required: the software device reads declarations out of the
//! source to report the active interface.
//! Run with: cargo test --test shader_program_integration_tests


use std::borrow::Cow;
use std::sync::{Arc, Mutex};

use device_test_utils::SoftwareGlDevice;
use galaxy_3d_safe_gl::glam::{Mat4, Vec3, Vec4};
use galaxy_3d_safe_gl::galaxy3d::device::{
    GlslType, PrimitiveMode, ResourceKind, ShaderStage, TextureTarget, UniformData,
};
use galaxy_3d_safe_gl::galaxy3d::resource::ResourceRegistry;
use galaxy_3d_safe_gl::galaxy3d::shader::{Diagnostic, Shader, ShaderProgram};
use galaxy_3d_safe_gl::galaxy3d::Error;

const VERTEX: &str = "#version 330 core
in vec3 position;
in vec2 uv;
in mat4 instance;
uniform mat4 u_matrix;
out vec2 v_uv;
void main()
{
    v_uv = uv;
    gl_Position = u_matrix * instance * vec4(position, 1.0);
}
";

const FRAGMENT: &str = "#version 330 core
in vec2 v_uv;
uniform sampler2D u_albedo;
uniform samplerCube u_env;
uniform vec4 u_tint;
uniform float u_weights[4];
out vec4 frag_color;
void main()
{
    frag_color = texture(u_albedo, v_uv) * u_tint * u_weights[0];
}
";

// ============================================================================
// TEST HELPERS
// ============================================================================

struct Setup {
    registry: Arc<ResourceRegistry>,
    device: SoftwareGlDevice,
    vertex: Shader,
    fragment: Shader,
    program: ShaderProgram,
}

fn linked_program() -> Setup {
    let registry = ResourceRegistry::new();
    let mut device = SoftwareGlDevice::new();
    let vertex = Shader::compile(&registry, &mut device, ShaderStage::Vertex, VERTEX).unwrap();
    let fragment = Shader::compile(&registry, &mut device, ShaderStage::Fragment, FRAGMENT).unwrap();
    let mut program = ShaderProgram::new(&registry, &mut device).unwrap();
    assert!(program.link(&mut device, &[&vertex, &fragment]));
    Setup { registry, device, vertex, fragment, program }
}

// ============================================================================
// LINK AND INTROSPECTION
// ============================================================================

#[test]
fn test_integration_link_reports_interface() {
    let setup = linked_program();
    let program = &setup.program;

    assert!(program.is_linked());
    assert_eq!(program.generation(), 1);

    let position = program.attribute("position").unwrap();
    assert_eq!((position.location, position.ty), (0, GlslType::Vec3));
    // Matrices use one slot per column
    assert_eq!(program.attribute("instance").unwrap().location, 2);

    let weights = program.uniform("u_weights").unwrap();
    assert_eq!((weights.name.as_str(), weights.ty, weights.size), ("u_weights", GlslType::Float, 4));
    assert!(program.uniform("u_weights[0]").is_some());
    assert_eq!(program.uniforms().len(), 5);
}

#[test]
fn test_integration_compile_failure_blocks_link() {
    let registry = ResourceRegistry::new();
    let mut device = SoftwareGlDevice::new();
    let broken = Shader::compile(&registry, &mut device, ShaderStage::Vertex, "void main() {").unwrap();
    let fragment = Shader::compile(&registry, &mut device, ShaderStage::Fragment, FRAGMENT).unwrap();
    let mut program = ShaderProgram::new(&registry, &mut device).unwrap();

    assert!(!broken.is_compiled());
    assert!(broken.info_log().contains("error"));
    assert!(!program.link(&mut device, &[&broken, &fragment]));
    assert!(!program.is_linked());

    let log = program.diagnostic_log();
    assert!(log.contains("compile failed"));
    assert!(log.contains("did not compile"));
}

#[test]
fn test_integration_failed_relink_keeps_interface() {
    let mut setup = linked_program();
    let lonely = Shader::compile(&setup.registry, &mut setup.device, ShaderStage::Vertex, VERTEX).unwrap();

    // Vertex only: the driver refuses to link
    assert!(!setup.program.link(&mut setup.device, &[&lonely]));

    assert!(!setup.program.is_linked());
    assert_eq!(setup.program.generation(), 1);
    assert!(setup.program.uniform("u_tint").is_some());
    assert!(setup.program.diagnostic_log().contains("no fragment shader attached"));

    // Writes are refused until the next successful link
    assert!(!setup.program.set_uniform(&mut setup.device, "u_tint", Vec4::ONE));
    assert!(setup.program.link(&mut setup.device, &[&setup.vertex, &setup.fragment]));
    assert_eq!(setup.program.generation(), 2);
    assert!(setup.program.set_uniform(&mut setup.device, "u_tint", Vec4::ONE));
}

// ============================================================================
// VALIDATED WRITES
// ============================================================================

#[test]
fn test_integration_valid_writes_reach_the_driver() {
    let mut setup = linked_program();
    let program_id = setup.program.id();
    let tint = setup.program.uniform("u_tint").unwrap().location;
    let weights = setup.program.uniform("u_weights").unwrap().location;

    assert!(setup.program.set_uniform(&mut setup.device, "u_matrix", Mat4::IDENTITY));
    assert!(setup.program.set_uniform(&mut setup.device, "u_tint", Vec4::new(1.0, 0.5, 0.25, 1.0)));
    assert!(setup.program.set_uniform_array(&mut setup.device, "u_weights", &[0.1f32, 0.2, 0.3, 0.4]));

    assert_eq!(
        setup.device.last_write(program_id, tint),
        Some(&UniformData::F32(Cow::Owned(vec![1.0, 0.5, 0.25, 1.0])))
    );
    assert_eq!(
        setup.device.last_write(program_id, weights),
        Some(&UniformData::F32(Cow::Owned(vec![0.1, 0.2, 0.3, 0.4])))
    );
    assert!(setup.program.diagnostics().is_empty());
}

#[test]
fn test_integration_invalid_writes_never_reach_the_driver() {
    let mut setup = linked_program();
    let writes_before = setup.device.uniform_writes.len();

    assert!(!setup.program.set_uniform(&mut setup.device, "u_tnit", Vec4::ONE));
    assert!(!setup.program.set_uniform(&mut setup.device, "u_tint", Vec3::ONE));
    assert!(!setup.program.set_uniform(&mut setup.device, "u_weights", 1.0f32));
    assert!(!setup.program.set_uniform_array(&mut setup.device, "u_weights", &[1.0f32, 2.0]));
    assert!(!setup.program.set_uniform(&mut setup.device, "u_tint", Vec3::ONE));

    assert_eq!(setup.device.uniform_writes.len(), writes_before);
    assert_eq!(setup.program.rejected_writes(), 5);
    assert_eq!(setup.program.diagnostics().len(), 4);
    assert!(matches!(setup.program.diagnostics()[0], Diagnostic::UnknownName { .. }));
    assert!(matches!(setup.program.diagnostics()[1], Diagnostic::TypeMismatch { .. }));
    assert!(matches!(setup.program.diagnostics()[2], Diagnostic::SizeMismatch { .. }));
}

#[test]
fn test_integration_observer_sees_every_rejection() {
    let mut setup = linked_program();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    setup.program.set_observer(move |diagnostic| sink.lock().unwrap().push(diagnostic.name().to_string()));

    setup.program.set_uniform(&mut setup.device, "u_missing", 1i32);
    setup.program.set_uniform(&mut setup.device, "u_missing", 1i32);

    assert_eq!(*seen.lock().unwrap(), vec!["u_missing", "u_missing"]);
    assert_eq!(setup.program.diagnostics().len(), 1);
}

#[test]
fn test_integration_textures() {
    let mut setup = linked_program();
    let albedo = setup.registry.create(&mut setup.device, ResourceKind::Texture).unwrap();
    let env = setup.registry.create(&mut setup.device, ResourceKind::Texture).unwrap();
    let buffer = setup.registry.create(&mut setup.device, ResourceKind::Buffer).unwrap();

    assert!(setup.program.set_texture(&mut setup.device, "u_albedo", 0, &albedo, TextureTarget::Texture2D));
    assert_eq!(setup.device.bound_textures[&0], (TextureTarget::Texture2D, Some(albedo.id())));

    // Cube texture into a 2D sampler, buffer as a texture: refused
    assert!(!setup.program.set_texture(&mut setup.device, "u_albedo", 1, &env, TextureTarget::TextureCube));
    assert!(!setup.program.set_texture(&mut setup.device, "u_albedo", 2, &buffer, TextureTarget::Texture2D));
    assert!(!setup.device.bound_textures.contains_key(&1));

    // Same unit as the 2D sampler: bound, but flagged
    assert!(setup.program.set_texture(&mut setup.device, "u_env", 0, &env, TextureTarget::TextureCube));
    assert!(setup
        .program
        .diagnostics()
        .iter()
        .any(|diagnostic| matches!(diagnostic, Diagnostic::TextureUnitConflict { unit: 0, .. })));
    assert_eq!(setup.program.rejected_writes(), 2);
}

// ============================================================================
// DRAWING
// ============================================================================

#[test]
fn test_integration_draw_enables_exactly_the_active_slots() {
    let mut setup = linked_program();

    setup.program.enable_attributes(&mut setup.device);
    let mut enabled = setup.device.enabled_attributes.clone();
    enabled.sort_unstable();
    // position 0, uv 1, instance 2..=5
    assert_eq!(enabled, vec![0, 1, 2, 3, 4, 5]);
    setup.program.disable_attributes(&mut setup.device);
    assert!(setup.device.enabled_attributes.is_empty());

    setup.program.draw_arrays(&mut setup.device, PrimitiveMode::Triangles, 0, 36).unwrap();
    assert_eq!(setup.device.draws, vec![(PrimitiveMode::Triangles, 36)]);
    assert!(setup.device.enabled_attributes.is_empty());
}

#[test]
fn test_integration_draw_without_context_fails() {
    let mut setup = linked_program();
    setup.device.context_current = false;

    let result = setup.program.draw_arrays(&mut setup.device, PrimitiveMode::Points, 0, 1);

    assert!(matches!(result, Err(Error::NoCurrentContext(_))));
    assert!(setup.device.draws.is_empty());
}

// ============================================================================
// TEARDOWN
// ============================================================================

#[test]
fn test_integration_program_and_shaders_are_swept() {
    let setup = linked_program();
    let Setup { registry, mut device, vertex, fragment, program } = setup;
    let ids = (program.id(), vertex.id(), fragment.id());

    drop(program);
    drop(vertex);
    drop(fragment);

    assert_eq!(registry.sweep(&mut device), 3);
    // Program first, then its shaders (in any order)
    assert_eq!(device.deleted[0], (ResourceKind::Program, ids.0));
    assert_eq!(device.delete_count(ResourceKind::Shader, ids.1), 1);
    assert_eq!(device.delete_count(ResourceKind::Shader, ids.2), 1);
}
