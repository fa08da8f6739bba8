//! Shader source generation from attribute and texture descriptors

mod descriptor;
mod generator;
mod widen;

pub use descriptor::{
    AttributeDescriptor, AttributeDisplay, AttributeUsage, Swizzle, TextureDescriptor, UvSource,
};
pub use generator::{
    generate_texture_shader, generate_vertex_attribute_shader, is_identifier, position_attribute,
    validate_attributes, GeneratedShader, ShaderGenConfig, ShaderGenerator,
};
pub use widen::widen;
