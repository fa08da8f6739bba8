/// VertexLayout - interleaved vertex format computed from attribute descriptors
///
/// Offsets follow declaration order and the stride is the sum of all
/// attribute sizes; nothing is discovered at runtime.

use crate::error::Result;
use crate::graphics_device::{BufferFormat, GlslType};
use crate::shader_gen::{validate_attributes, AttributeDescriptor};

/// One attribute inside the interleaved vertex
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayoutEntry {
    pub name: String,
    pub format: BufferFormat,
    pub normalized: bool,
    /// Byte offset from the start of the vertex
    pub offset: u32,
    glsl_type: GlslType,
}

impl VertexLayoutEntry {
    /// Shader input type this entry feeds
    pub fn glsl_type(&self) -> GlslType {
        self.glsl_type
    }
}

/// Ordered attributes of one interleaved vertex buffer
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayout {
    entries: Vec<VertexLayoutEntry>,
    stride: u32,
}

impl VertexLayout {
    /// Build the layout of `attributes`, packed in declaration order
    ///
    /// # Errors
    ///
    /// Same validation as the shader generator (`EmptyAttributeList`,
    /// `InvalidAttribute`).
    pub fn from_descriptors(attributes: &[AttributeDescriptor]) -> Result<Self> {
        validate_attributes(attributes)?;

        let mut entries = Vec::with_capacity(attributes.len());
        let mut offset = 0;
        for attribute in attributes {
            // Validated above: 1-4 components of a non-bool scalar
            let (Some(format), Some(glsl_type)) = (attribute.buffer_format(), attribute.glsl_type()) else {
                continue;
            };
            entries.push(VertexLayoutEntry {
                name: attribute.name.clone(),
                format,
                normalized: attribute.normalized,
                offset,
                glsl_type,
            });
            offset += format.size_bytes();
        }

        Ok(Self { entries, stride: offset })
    }

    pub fn entries(&self) -> &[VertexLayoutEntry] {
        &self.entries
    }

    /// Entry by attribute name
    pub fn entry(&self, name: &str) -> Option<&VertexLayoutEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Size in bytes of one vertex
    pub fn stride(&self) -> u32 {
        self.stride
    }
}

#[cfg(test)]
#[path = "vertex_layout_tests.rs"]
mod tests;
