/// Uniform value types accepted by the validated setters
///
/// Each Rust value type maps to exactly one GLSL type. A setter call is
/// forwarded only if that type equals the type the linked program reports
/// for the uniform, so `set_uniform("u_color", Vec3::ONE)` can never reach a
/// `vec4` or `int` uniform.

use std::borrow::Cow;
use std::fmt;

use glam::{BVec2, BVec3, BVec4, IVec2, IVec3, IVec4, Mat2, Mat3, Mat4, UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};

use crate::graphics_device::{GlslType, UniformData};

/// A value that can be written to a uniform of one specific GLSL type
pub trait UniformValue: Copy + fmt::Debug + 'static {
    /// GLSL type this value is written to
    const TYPE: GlslType;

    /// Flatten `values` into the scalar payload of one native write
    fn upload(values: &[Self]) -> UniformData<'_>;
}

macro_rules! impl_pod_uniform {
    ($ty:ty, $glsl:ident, $data:ident) => {
        impl UniformValue for $ty {
            const TYPE: GlslType = GlslType::$glsl;

            fn upload(values: &[Self]) -> UniformData<'_> {
                UniformData::$data(Cow::Borrowed(bytemuck::cast_slice(values)))
            }
        }
    };
}

impl_pod_uniform!(f32, Float, F32);
impl_pod_uniform!(Vec2, Vec2, F32);
impl_pod_uniform!(Vec3, Vec3, F32);
impl_pod_uniform!(Vec4, Vec4, F32);
impl_pod_uniform!(i32, Int, I32);
impl_pod_uniform!(IVec2, IVec2, I32);
impl_pod_uniform!(IVec3, IVec3, I32);
impl_pod_uniform!(IVec4, IVec4, I32);
impl_pod_uniform!(u32, UInt, U32);
impl_pod_uniform!(UVec2, UVec2, U32);
impl_pod_uniform!(UVec3, UVec3, U32);
impl_pod_uniform!(UVec4, UVec4, U32);
impl_pod_uniform!(Mat2, Mat2, F32);
impl_pod_uniform!(Mat3, Mat3, F32);
impl_pod_uniform!(Mat4, Mat4, F32);

// Booleans are written through the int entry points (0 / 1)

impl UniformValue for bool {
    const TYPE: GlslType = GlslType::Bool;

    fn upload(values: &[Self]) -> UniformData<'_> {
        UniformData::I32(Cow::Owned(values.iter().map(|v| *v as i32).collect()))
    }
}

impl UniformValue for BVec2 {
    const TYPE: GlslType = GlslType::BVec2;

    fn upload(values: &[Self]) -> UniformData<'_> {
        UniformData::I32(Cow::Owned(
            values.iter().flat_map(|v| [v.x as i32, v.y as i32]).collect(),
        ))
    }
}

impl UniformValue for BVec3 {
    const TYPE: GlslType = GlslType::BVec3;

    fn upload(values: &[Self]) -> UniformData<'_> {
        UniformData::I32(Cow::Owned(
            values.iter().flat_map(|v| [v.x as i32, v.y as i32, v.z as i32]).collect(),
        ))
    }
}

impl UniformValue for BVec4 {
    const TYPE: GlslType = GlslType::BVec4;

    fn upload(values: &[Self]) -> UniformData<'_> {
        UniformData::I32(Cow::Owned(
            values
                .iter()
                .flat_map(|v| [v.x as i32, v.y as i32, v.z as i32, v.w as i32])
                .collect(),
        ))
    }
}

#[cfg(test)]
#[path = "uniform_tests.rs"]
mod tests;
