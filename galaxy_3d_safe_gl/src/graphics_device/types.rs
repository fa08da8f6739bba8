/// Plain value types shared by the device trait, the registry and the shader layer

use std::borrow::Cow;
use std::fmt;

// ===== RESOURCE KINDS =====

/// Kind of native GL object behind a handle
///
/// Every kind has its own generate/delete entry points in the native API,
/// so the registry keeps one reference-count map per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Buffer,
    Texture,
    VertexArray,
    Framebuffer,
    Renderbuffer,
    Sampler,
    Query,
    Shader,
    Program,
}

impl ResourceKind {
    /// Number of kinds
    pub const COUNT: usize = 9;

    /// All kinds, in sweep order
    ///
    /// Programs go before shaders, and attachments (textures, renderbuffers)
    /// after the framebuffers that reference them.
    pub const ALL: [ResourceKind; Self::COUNT] = [
        ResourceKind::Program,
        ResourceKind::Shader,
        ResourceKind::VertexArray,
        ResourceKind::Buffer,
        ResourceKind::Framebuffer,
        ResourceKind::Renderbuffer,
        ResourceKind::Texture,
        ResourceKind::Sampler,
        ResourceKind::Query,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Buffer => "Buffer",
            ResourceKind::Texture => "Texture",
            ResourceKind::VertexArray => "VertexArray",
            ResourceKind::Framebuffer => "Framebuffer",
            ResourceKind::Renderbuffer => "Renderbuffer",
            ResourceKind::Sampler => "Sampler",
            ResourceKind::Query => "Query",
            ResourceKind::Shader => "Shader",
            ResourceKind::Program => "Program",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
    Compute,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Compute => "compute",
        };
        f.write_str(name)
    }
}

// ===== GLSL TYPES =====

/// Scalar component type of a GLSL value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Float,
    Int,
    UInt,
    Bool,
}

/// Texture binding target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Texture2D,
    Texture3D,
    TextureCube,
    Texture2DArray,
}

impl TextureTarget {
    /// Float sampler type reading from this target
    pub fn sampler_type(&self) -> GlslType {
        match self {
            TextureTarget::Texture2D => GlslType::Sampler2D,
            TextureTarget::Texture3D => GlslType::Sampler3D,
            TextureTarget::TextureCube => GlslType::SamplerCube,
            TextureTarget::Texture2DArray => GlslType::Sampler2DArray,
        }
    }
}

/// GLSL type of an active attribute or uniform, as reported after a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlslType {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Int,
    IVec2,
    IVec3,
    IVec4,
    UInt,
    UVec2,
    UVec3,
    UVec4,
    Bool,
    BVec2,
    BVec3,
    BVec4,
    Mat2,
    Mat3,
    Mat4,
    Sampler2D,
    Sampler3D,
    SamplerCube,
    Sampler2DArray,
    Sampler2DShadow,
    ISampler2D,
    USampler2D,
    /// A type the engine has no setter for (raw GL enum value)
    Other(u32),
}

impl GlslType {
    /// GLSL spelling of the type
    pub fn glsl_name(&self) -> Cow<'static, str> {
        let name = match self {
            GlslType::Float => "float",
            GlslType::Vec2 => "vec2",
            GlslType::Vec3 => "vec3",
            GlslType::Vec4 => "vec4",
            GlslType::Int => "int",
            GlslType::IVec2 => "ivec2",
            GlslType::IVec3 => "ivec3",
            GlslType::IVec4 => "ivec4",
            GlslType::UInt => "uint",
            GlslType::UVec2 => "uvec2",
            GlslType::UVec3 => "uvec3",
            GlslType::UVec4 => "uvec4",
            GlslType::Bool => "bool",
            GlslType::BVec2 => "bvec2",
            GlslType::BVec3 => "bvec3",
            GlslType::BVec4 => "bvec4",
            GlslType::Mat2 => "mat2",
            GlslType::Mat3 => "mat3",
            GlslType::Mat4 => "mat4",
            GlslType::Sampler2D => "sampler2D",
            GlslType::Sampler3D => "sampler3D",
            GlslType::SamplerCube => "samplerCube",
            GlslType::Sampler2DArray => "sampler2DArray",
            GlslType::Sampler2DShadow => "sampler2DShadow",
            GlslType::ISampler2D => "isampler2D",
            GlslType::USampler2D => "usampler2D",
            GlslType::Other(raw) => return Cow::Owned(format!("<gl type 0x{:04X}>", raw)),
        };
        Cow::Borrowed(name)
    }

    /// Scalar type of each component (samplers are set through int uniforms)
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            GlslType::Float | GlslType::Vec2 | GlslType::Vec3 | GlslType::Vec4
            | GlslType::Mat2 | GlslType::Mat3 | GlslType::Mat4 => Some(ScalarKind::Float),
            GlslType::Int | GlslType::IVec2 | GlslType::IVec3 | GlslType::IVec4 => Some(ScalarKind::Int),
            GlslType::UInt | GlslType::UVec2 | GlslType::UVec3 | GlslType::UVec4 => Some(ScalarKind::UInt),
            GlslType::Bool | GlslType::BVec2 | GlslType::BVec3 | GlslType::BVec4 => Some(ScalarKind::Bool),
            GlslType::Sampler2D | GlslType::Sampler3D | GlslType::SamplerCube
            | GlslType::Sampler2DArray | GlslType::Sampler2DShadow
            | GlslType::ISampler2D | GlslType::USampler2D => Some(ScalarKind::Int),
            GlslType::Other(_) => None,
        }
    }

    /// Number of scalar components in one element
    pub fn components(&self) -> u32 {
        match self {
            GlslType::Vec2 | GlslType::IVec2 | GlslType::UVec2 | GlslType::BVec2 => 2,
            GlslType::Vec3 | GlslType::IVec3 | GlslType::UVec3 | GlslType::BVec3 => 3,
            GlslType::Vec4 | GlslType::IVec4 | GlslType::UVec4 | GlslType::BVec4 | GlslType::Mat2 => 4,
            GlslType::Mat3 => 9,
            GlslType::Mat4 => 16,
            _ => 1,
        }
    }

    /// Number of consecutive vertex attribute slots one element occupies
    pub fn attribute_slots(&self) -> u32 {
        match self {
            GlslType::Mat2 => 2,
            GlslType::Mat3 => 3,
            GlslType::Mat4 => 4,
            _ => 1,
        }
    }

    pub fn is_sampler(&self) -> bool {
        self.sampler_target().is_some()
    }

    /// Texture target a sampler of this type reads from
    pub fn sampler_target(&self) -> Option<TextureTarget> {
        match self {
            GlslType::Sampler2D | GlslType::Sampler2DShadow
            | GlslType::ISampler2D | GlslType::USampler2D => Some(TextureTarget::Texture2D),
            GlslType::Sampler3D => Some(TextureTarget::Texture3D),
            GlslType::SamplerCube => Some(TextureTarget::TextureCube),
            GlslType::Sampler2DArray => Some(TextureTarget::Texture2DArray),
            _ => None,
        }
    }
}

impl fmt::Display for GlslType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.glsl_name())
    }
}

// ===== VERTEX FORMATS =====

/// Vertex attribute storage format (32-bit components only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum BufferFormat {
    R32_SFLOAT,
    R32G32_SFLOAT,
    R32G32B32_SFLOAT,
    R32G32B32A32_SFLOAT,

    R32_SINT,
    R32G32_SINT,
    R32G32B32_SINT,
    R32G32B32A32_SINT,

    R32_UINT,
    R32G32_UINT,
    R32G32B32_UINT,
    R32G32B32A32_UINT,
}

impl BufferFormat {
    /// Format for `count` components of `scalar` (bool is stored as uint)
    pub fn from_components(count: u32, scalar: ScalarKind) -> Option<Self> {
        use BufferFormat::*;
        let format = match (scalar, count) {
            (ScalarKind::Float, 1) => R32_SFLOAT,
            (ScalarKind::Float, 2) => R32G32_SFLOAT,
            (ScalarKind::Float, 3) => R32G32B32_SFLOAT,
            (ScalarKind::Float, 4) => R32G32B32A32_SFLOAT,
            (ScalarKind::Int, 1) => R32_SINT,
            (ScalarKind::Int, 2) => R32G32_SINT,
            (ScalarKind::Int, 3) => R32G32B32_SINT,
            (ScalarKind::Int, 4) => R32G32B32A32_SINT,
            (ScalarKind::UInt | ScalarKind::Bool, 1) => R32_UINT,
            (ScalarKind::UInt | ScalarKind::Bool, 2) => R32G32_UINT,
            (ScalarKind::UInt | ScalarKind::Bool, 3) => R32G32B32_UINT,
            (ScalarKind::UInt | ScalarKind::Bool, 4) => R32G32B32A32_UINT,
            _ => return None,
        };
        Some(format)
    }

    pub fn component_count(&self) -> u32 {
        use BufferFormat::*;
        match self {
            R32_SFLOAT | R32_SINT | R32_UINT => 1,
            R32G32_SFLOAT | R32G32_SINT | R32G32_UINT => 2,
            R32G32B32_SFLOAT | R32G32B32_SINT | R32G32B32_UINT => 3,
            R32G32B32A32_SFLOAT | R32G32B32A32_SINT | R32G32B32A32_UINT => 4,
        }
    }

    pub fn scalar_kind(&self) -> ScalarKind {
        use BufferFormat::*;
        match self {
            R32_SFLOAT | R32G32_SFLOAT | R32G32B32_SFLOAT | R32G32B32A32_SFLOAT => ScalarKind::Float,
            R32_SINT | R32G32_SINT | R32G32B32_SINT | R32G32B32A32_SINT => ScalarKind::Int,
            R32_UINT | R32G32_UINT | R32G32B32_UINT | R32G32B32A32_UINT => ScalarKind::UInt,
        }
    }

    /// Size in bytes of one element
    pub fn size_bytes(&self) -> u32 {
        self.component_count() * 4
    }
}

// ===== DRAWING =====

/// Primitive assembly mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Index buffer element type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    U8,
    U16,
    U32,
}

impl IndexType {
    /// Size in bytes of one index element
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U8 => 1,
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

// ===== INTROSPECTION =====

/// One entry of a program's active attribute or active uniform list
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveVariable {
    /// Name as reported by the driver (arrays may carry a `[0]` suffix)
    pub name: String,
    /// Declared type
    pub ty: GlslType,
    /// Declared array size (1 for non-arrays)
    pub size: i32,
}

/// Driver identification strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
    pub shading_language_version: String,
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / GL {} / GLSL {}",
            self.vendor, self.renderer, self.version, self.shading_language_version
        )
    }
}

// ===== UNIFORM UPLOAD =====

/// Flattened scalar payload of a uniform write
///
/// The element layout is given by the `GlslType` passed next to it:
/// `Vec3` with 6 floats is a two-element array, `Mat4` with 16 floats is one
/// column-major matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformData<'a> {
    F32(Cow<'a, [f32]>),
    I32(Cow<'a, [i32]>),
    U32(Cow<'a, [u32]>),
}

impl UniformData<'_> {
    /// Number of scalars in the payload
    pub fn len(&self) -> usize {
        match self {
            UniformData::F32(values) => values.len(),
            UniformData::I32(values) => values.len(),
            UniformData::U32(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Detach the payload from borrowed storage
    pub fn into_owned(self) -> UniformData<'static> {
        match self {
            UniformData::F32(values) => UniformData::F32(Cow::Owned(values.into_owned())),
            UniformData::I32(values) => UniformData::I32(Cow::Owned(values.into_owned())),
            UniformData::U32(values) => UniformData::U32(Cow::Owned(values.into_owned())),
        }
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
