//! Integration tests for generated shaders
//!
//! Generated sources go through compile, link, uniform writes, vertex
//! layout and draw on the software device.
//! Run with: cargo test --test shader_gen_integration_tests


use std::borrow::Cow;

use device_test_utils::SoftwareGlDevice;
use galaxy_3d_safe_gl::glam::Mat4;
use galaxy_3d_safe_gl::galaxy3d::device::{
    BufferFormat, GlslType, PrimitiveMode, ResourceKind, ShaderStage, TextureTarget, UniformData,
};
use galaxy_3d_safe_gl::galaxy3d::resource::ResourceRegistry;
use galaxy_3d_safe_gl::galaxy3d::shader::{Shader, ShaderProgram, VertexLayout};
use galaxy_3d_safe_gl::galaxy3d::shader_gen::{
    generate_texture_shader, generate_vertex_attribute_shader, AttributeDescriptor, AttributeDisplay,
    AttributeUsage, GeneratedShader, TextureDescriptor, UvSource,
};
use galaxy_3d_safe_gl::galaxy3d::Error;

// ============================================================================
// TEST HELPERS
// ============================================================================

fn mesh_attributes() -> Vec<AttributeDescriptor> {
    vec![
        AttributeDescriptor::float("position", 3).with_usage(AttributeUsage::Position),
        AttributeDescriptor::float("normal", 3)
            .with_usage(AttributeUsage::Normal)
            .with_display(AttributeDisplay::NORMALIZE | AttributeDisplay::REMAP_SIGNED),
        AttributeDescriptor::float("uv", 2).with_usage(AttributeUsage::TexCoord(0)),
        AttributeDescriptor::int("material", 1),
    ]
}

fn build(device: &mut SoftwareGlDevice, generated: &GeneratedShader) -> (std::sync::Arc<ResourceRegistry>, ShaderProgram) {
    let registry = ResourceRegistry::new();
    let vertex = Shader::compile(&registry, device, ShaderStage::Vertex, &generated.vertex).unwrap();
    let fragment = Shader::compile(&registry, device, ShaderStage::Fragment, &generated.fragment).unwrap();
    assert!(vertex.is_compiled(), "{}", vertex.info_log());
    assert!(fragment.is_compiled(), "{}", fragment.info_log());

    let mut program = ShaderProgram::new(&registry, device).unwrap();
    assert!(program.link(device, &[&vertex, &fragment]), "{}", program.diagnostic_log());
    (registry, program)
}

// ============================================================================
// VISUALIZATION MODE
// ============================================================================

#[test]
fn test_integration_visualization_shader_links_and_draws() {
    let attributes = mesh_attributes();
    let generated = generate_vertex_attribute_shader(&attributes).unwrap();
    let mut device = SoftwareGlDevice::new();
    let (_registry, mut program) = build(&mut device, &generated);

    // Every attribute is an input; the interface matches the descriptors
    for attribute in &attributes {
        let info = program.attribute(&attribute.name).unwrap();
        assert_eq!(Some(info.ty), attribute.glsl_type());
    }
    assert_eq!(program.attribute("material").unwrap().ty, GlslType::Int);
    assert_eq!(program.uniform("u_selector").unwrap().ty, GlslType::Int);

    // Walk every case of the selector
    for index in 0..attributes.len() as i32 {
        assert!(program.set_uniform(&mut device, "u_selector", index));
    }
    assert!(program.set_uniform(&mut device, "u_matrix", Mat4::IDENTITY));

    let selector = program.uniform("u_selector").unwrap().location;
    assert_eq!(
        device.last_write(program.id(), selector),
        Some(&UniformData::I32(Cow::Owned(vec![3])))
    );

    program.draw_arrays(&mut device, PrimitiveMode::Triangles, 0, 3).unwrap();
    assert_eq!(device.draws, vec![(PrimitiveMode::Triangles, 3)]);
    assert!(program.diagnostics().is_empty());
}

#[test]
fn test_integration_layout_from_the_same_descriptors() {
    let attributes = mesh_attributes();
    let generated = generate_vertex_attribute_shader(&attributes).unwrap();
    let layout = VertexLayout::from_descriptors(&attributes).unwrap();
    let mut device = SoftwareGlDevice::new();
    let (_registry, mut program) = build(&mut device, &generated);

    assert_eq!(program.bind_vertex_layout(&mut device, &layout), 4);

    // 3 + 3 + 2 floats + 1 int, tightly packed
    assert_eq!(layout.stride(), 36);
    assert_eq!(
        device.attribute_pointers,
        vec![
            (0, BufferFormat::R32G32B32_SFLOAT, false, 36, 0),
            (1, BufferFormat::R32G32B32_SFLOAT, false, 36, 12),
            (2, BufferFormat::R32G32_SFLOAT, false, 36, 24),
            (3, BufferFormat::R32_SINT, false, 36, 32),
        ]
    );
    assert!(program.diagnostics().is_empty());
}

#[test]
fn test_integration_generator_errors_come_before_any_native_call() {
    let device = SoftwareGlDevice::new();

    let result = generate_vertex_attribute_shader(&[AttributeDescriptor::float("gl_Vertex", 4)]);

    assert!(matches!(result, Err(Error::InvalidAttribute(_))));
    assert_eq!(device.native_calls, 0);
}

// ============================================================================
// TEXTURE MODE
// ============================================================================

#[test]
fn test_integration_texture_shader_binds_every_sampler() {
    let attributes = mesh_attributes();
    let textures = [
        TextureDescriptor::new("u_albedo"),
        TextureDescriptor::new("u_matcap").with_uv_source(UvSource::SphereMap),
        TextureDescriptor::new("u_env").with_uv_source(UvSource::ReflectionCube),
    ];
    let generated = generate_texture_shader(&textures, &attributes).unwrap();
    let mut device = SoftwareGlDevice::new();
    let (registry, mut program) = build(&mut device, &generated);

    let albedo = registry.create(&mut device, ResourceKind::Texture).unwrap();
    let matcap = registry.create(&mut device, ResourceKind::Texture).unwrap();
    let env = registry.create(&mut device, ResourceKind::Texture).unwrap();

    assert!(program.set_texture(&mut device, "u_albedo", 0, &albedo, TextureTarget::Texture2D));
    assert!(program.set_texture(&mut device, "u_matcap", 1, &matcap, TextureTarget::Texture2D));
    assert!(program.set_texture(&mut device, "u_env", 2, &env, TextureTarget::TextureCube));
    assert!(program.set_uniform(&mut device, "u_view_matrix", Mat4::IDENTITY));
    assert!(program.set_uniform(&mut device, "u_selector", 2i32));

    assert_eq!(device.bound_textures[&2], (TextureTarget::TextureCube, Some(env.id())));
    assert!(program.diagnostics().is_empty());
}

#[test]
fn test_integration_texture_shader_missing_usage() {
    let attributes = [AttributeDescriptor::float("position", 3).with_usage(AttributeUsage::Position)];

    let result = generate_texture_shader(&[TextureDescriptor::new("u_albedo")], &attributes);

    let Err(error) = result else {
        panic!("texcoord0 is required");
    };
    assert!(matches!(error, Error::MissingAttributeUsage { usage: AttributeUsage::TexCoord(0), .. }));
    assert!(error.to_string().contains("texcoord0"));
}
