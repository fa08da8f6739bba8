//! Unit tests for shader/vertex_layout.rs

use super::*;
use crate::error::Error;
use crate::graphics_device::ScalarKind;

#[test]
fn test_offsets_follow_declaration_order() {
    let layout = VertexLayout::from_descriptors(&[
        AttributeDescriptor::float("position", 3),
        AttributeDescriptor::float("normal", 3),
        AttributeDescriptor::float("uv", 2),
        AttributeDescriptor::uint("joints", 4),
    ])
    .unwrap();

    let offsets: Vec<u32> = layout.entries().iter().map(|e| e.offset).collect();
    assert_eq!(offsets, vec![0, 12, 24, 32]);
    assert_eq!(layout.stride(), 48);
    assert_eq!(layout.entry("uv").unwrap().format, BufferFormat::R32G32_SFLOAT);
    assert_eq!(layout.entry("joints").unwrap().glsl_type(), GlslType::UVec4);
}

#[test]
fn test_normalized_integer_feeds_float_input() {
    let layout = VertexLayout::from_descriptors(&[
        AttributeDescriptor::new("color", 4, ScalarKind::UInt).with_normalized(true),
    ])
    .unwrap();

    let entry = layout.entry("color").unwrap();
    assert!(entry.normalized);
    assert_eq!(entry.format, BufferFormat::R32G32B32A32_UINT);
    assert_eq!(entry.glsl_type(), GlslType::Vec4);
}

#[test]
fn test_invalid_descriptors_are_rejected() {
    assert_eq!(VertexLayout::from_descriptors(&[]), Err(Error::EmptyAttributeList));
    assert!(matches!(
        VertexLayout::from_descriptors(&[AttributeDescriptor::float("position", 5)]),
        Err(Error::InvalidAttribute(_))
    ));
}
