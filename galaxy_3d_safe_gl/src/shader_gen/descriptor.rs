/// Generator inputs: attribute and texture descriptors
///
/// An ordered list of `AttributeDescriptor`s describes one interleaved vertex
/// format. The same list drives the shader generator and `VertexLayout`, so
/// the generated inputs and the buffer offsets always agree.

use std::fmt;

use bitflags::bitflags;

use crate::graphics_device::{BufferFormat, GlslType, ScalarKind};

// ===== ATTRIBUTES =====

/// Semantic role of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeUsage {
    Position,
    Normal,
    Tangent,
    Bitangent,
    /// Texture coordinate set `n`
    TexCoord(u32),
    None,
}

impl fmt::Display for AttributeUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeUsage::Position => f.write_str("position"),
            AttributeUsage::Normal => f.write_str("normal"),
            AttributeUsage::Tangent => f.write_str("tangent"),
            AttributeUsage::Bitangent => f.write_str("bitangent"),
            AttributeUsage::TexCoord(set) => write!(f, "texcoord{}", set),
            AttributeUsage::None => f.write_str("none"),
        }
    }
}

bitflags! {
    /// How the visualization shader turns an attribute into a color
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AttributeDisplay: u32 {
        /// `normalize()` the value before display
        const NORMALIZE    = 1 << 0;
        /// Map [-1, 1] to [0, 1]
        const REMAP_SIGNED = 1 << 1;
    }
}

/// One vertex attribute, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDescriptor {
    /// Shader input name
    pub name: String,
    /// Components per vertex (1-4)
    pub components: u32,
    /// Storage type of each component (`Float`, `Int` or `UInt`)
    pub base_type: ScalarKind,
    /// Integer data is normalized to [0, 1] / [-1, 1] and read as float
    pub normalized: bool,
    pub usage: AttributeUsage,
    pub display: AttributeDisplay,
}

impl AttributeDescriptor {
    pub fn new(name: &str, components: u32, base_type: ScalarKind) -> Self {
        Self {
            name: name.to_string(),
            components,
            base_type,
            normalized: false,
            usage: AttributeUsage::None,
            display: AttributeDisplay::empty(),
        }
    }

    pub fn float(name: &str, components: u32) -> Self {
        Self::new(name, components, ScalarKind::Float)
    }

    pub fn int(name: &str, components: u32) -> Self {
        Self::new(name, components, ScalarKind::Int)
    }

    pub fn uint(name: &str, components: u32) -> Self {
        Self::new(name, components, ScalarKind::UInt)
    }

    pub fn with_usage(mut self, usage: AttributeUsage) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_display(mut self, display: AttributeDisplay) -> Self {
        self.display = display;
        self
    }

    pub fn with_normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    /// Whether the shader sees integer values (needs `flat` interpolation)
    pub fn is_integer(&self) -> bool {
        !self.normalized && matches!(self.base_type, ScalarKind::Int | ScalarKind::UInt)
    }

    /// Type of the shader input, None for an invalid descriptor
    pub fn glsl_type(&self) -> Option<GlslType> {
        let scalar = if self.is_integer() { self.base_type } else { ScalarKind::Float };
        let ty = match (scalar, self.components) {
            (ScalarKind::Float, 1) => GlslType::Float,
            (ScalarKind::Float, 2) => GlslType::Vec2,
            (ScalarKind::Float, 3) => GlslType::Vec3,
            (ScalarKind::Float, 4) => GlslType::Vec4,
            (ScalarKind::Int, 1) => GlslType::Int,
            (ScalarKind::Int, 2) => GlslType::IVec2,
            (ScalarKind::Int, 3) => GlslType::IVec3,
            (ScalarKind::Int, 4) => GlslType::IVec4,
            (ScalarKind::UInt, 1) => GlslType::UInt,
            (ScalarKind::UInt, 2) => GlslType::UVec2,
            (ScalarKind::UInt, 3) => GlslType::UVec3,
            (ScalarKind::UInt, 4) => GlslType::UVec4,
            _ => return None,
        };
        Some(ty)
    }

    /// Storage format in the vertex buffer, None for an invalid descriptor
    pub fn buffer_format(&self) -> Option<BufferFormat> {
        match self.base_type {
            ScalarKind::Bool => None,
            scalar => BufferFormat::from_components(self.components, scalar),
        }
    }
}

// ===== TEXTURES =====

/// Where a texture lookup takes its coordinate from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UvSource {
    /// Raw texcoord0
    TexCoord,
    /// Sphere map from the view-space normal (`sampler2D`)
    SphereMap,
    /// Reflection vector into a cube map (`samplerCube`)
    ReflectionCube,
}

impl UvSource {
    /// Sampler type declared for this lookup
    pub fn sampler_type(&self) -> GlslType {
        match self {
            UvSource::TexCoord | UvSource::SphereMap => GlslType::Sampler2D,
            UvSource::ReflectionCube => GlslType::SamplerCube,
        }
    }
}

/// Channels written to the output color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Swizzle {
    /// RGB passed through
    #[default]
    Rgb,
    /// One channel broadcast to RGB
    R,
    G,
    B,
    A,
}

impl Swizzle {
    /// GLSL swizzle applied to the sampled `vec4`
    pub fn glsl(&self) -> &'static str {
        match self {
            Swizzle::Rgb => "rgb",
            Swizzle::R => "rrr",
            Swizzle::G => "ggg",
            Swizzle::B => "bbb",
            Swizzle::A => "aaa",
        }
    }
}

/// One texture shown by the texture-mode fragment shader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDescriptor {
    /// Sampler uniform name
    pub name: String,
    pub uv_source: UvSource,
    pub swizzle: Swizzle,
}

impl TextureDescriptor {
    /// Plain texcoord0 lookup, RGB pass-through
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            uv_source: UvSource::TexCoord,
            swizzle: Swizzle::Rgb,
        }
    }

    pub fn with_uv_source(mut self, uv_source: UvSource) -> Self {
        self.uv_source = uv_source;
        self
    }

    pub fn with_swizzle(mut self, swizzle: Swizzle) -> Self {
        self.swizzle = swizzle;
        self
    }
}
