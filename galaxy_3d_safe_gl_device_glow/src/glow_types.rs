/// Conversions between engine value types and GL enums

use galaxy_3d_safe_gl::galaxy3d::device::{
    BufferFormat, GlslType, IndexType, PrimitiveMode, ScalarKind, ShaderStage, TextureTarget,
};

pub(crate) fn shader_stage_to_gl(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        ShaderStage::Geometry => glow::GEOMETRY_SHADER,
        ShaderStage::Compute => glow::COMPUTE_SHADER,
    }
}

pub(crate) fn texture_target_to_gl(target: TextureTarget) -> u32 {
    match target {
        TextureTarget::Texture2D => glow::TEXTURE_2D,
        TextureTarget::Texture3D => glow::TEXTURE_3D,
        TextureTarget::TextureCube => glow::TEXTURE_CUBE_MAP,
        TextureTarget::Texture2DArray => glow::TEXTURE_2D_ARRAY,
    }
}

pub(crate) fn primitive_mode_to_gl(mode: PrimitiveMode) -> u32 {
    match mode {
        PrimitiveMode::Points => glow::POINTS,
        PrimitiveMode::Lines => glow::LINES,
        PrimitiveMode::LineStrip => glow::LINE_STRIP,
        PrimitiveMode::Triangles => glow::TRIANGLES,
        PrimitiveMode::TriangleStrip => glow::TRIANGLE_STRIP,
        PrimitiveMode::TriangleFan => glow::TRIANGLE_FAN,
    }
}

pub(crate) fn index_type_to_gl(index_type: IndexType) -> u32 {
    match index_type {
        IndexType::U8 => glow::UNSIGNED_BYTE,
        IndexType::U16 => glow::UNSIGNED_SHORT,
        IndexType::U32 => glow::UNSIGNED_INT,
    }
}

/// `(component count, component type)` for `glVertexAttrib*Pointer`
pub(crate) fn buffer_format_to_gl(format: BufferFormat) -> (i32, u32) {
    let data_type = match format.scalar_kind() {
        ScalarKind::Float => glow::FLOAT,
        ScalarKind::Int => glow::INT,
        ScalarKind::UInt | ScalarKind::Bool => glow::UNSIGNED_INT,
    };
    (format.component_count() as i32, data_type)
}

/// Type enum reported by `glGetActiveAttrib` / `glGetActiveUniform`
pub(crate) fn glsl_type_from_gl(gl_type: u32) -> GlslType {
    match gl_type {
        glow::FLOAT => GlslType::Float,
        glow::FLOAT_VEC2 => GlslType::Vec2,
        glow::FLOAT_VEC3 => GlslType::Vec3,
        glow::FLOAT_VEC4 => GlslType::Vec4,
        glow::INT => GlslType::Int,
        glow::INT_VEC2 => GlslType::IVec2,
        glow::INT_VEC3 => GlslType::IVec3,
        glow::INT_VEC4 => GlslType::IVec4,
        glow::UNSIGNED_INT => GlslType::UInt,
        glow::UNSIGNED_INT_VEC2 => GlslType::UVec2,
        glow::UNSIGNED_INT_VEC3 => GlslType::UVec3,
        glow::UNSIGNED_INT_VEC4 => GlslType::UVec4,
        glow::BOOL => GlslType::Bool,
        glow::BOOL_VEC2 => GlslType::BVec2,
        glow::BOOL_VEC3 => GlslType::BVec3,
        glow::BOOL_VEC4 => GlslType::BVec4,
        glow::FLOAT_MAT2 => GlslType::Mat2,
        glow::FLOAT_MAT3 => GlslType::Mat3,
        glow::FLOAT_MAT4 => GlslType::Mat4,
        glow::SAMPLER_2D => GlslType::Sampler2D,
        glow::SAMPLER_3D => GlslType::Sampler3D,
        glow::SAMPLER_CUBE => GlslType::SamplerCube,
        glow::SAMPLER_2D_ARRAY => GlslType::Sampler2DArray,
        glow::SAMPLER_2D_SHADOW => GlslType::Sampler2DShadow,
        glow::INT_SAMPLER_2D => GlslType::ISampler2D,
        glow::UNSIGNED_INT_SAMPLER_2D => GlslType::USampler2D,
        other => GlslType::Other(other),
    }
}

#[cfg(test)]
#[path = "glow_types_tests.rs"]
mod tests;
