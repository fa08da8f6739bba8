/// Diagnostics recorded by `ShaderProgram` in place of an invalid native call

use std::fmt;

use crate::graphics_device::{GlslType, ResourceKind};

/// One rejected setter call (or one sampler-type conflict on a texture unit)
///
/// A diagnostic always means the native layer was NOT called for the
/// rejected write. `TextureUnitConflict` is the exception: it is raised next
/// to an accepted `set_texture`, to flag a unit that now holds a different
/// sampler type than on the previous bind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Diagnostic {
    /// Setter called before the program was successfully linked
    UnlinkedProgram {
        name: String,
        attempted: GlslType,
        value: String,
    },

    /// Name is not an active uniform of the linked program
    UnknownName {
        name: String,
        attempted: GlslType,
        value: String,
    },

    /// Value type differs from the declared type
    TypeMismatch {
        name: String,
        expected: GlslType,
        expected_size: i32,
        attempted: GlslType,
        attempted_size: usize,
        value: String,
    },

    /// Element count differs from the declared array size
    SizeMismatch {
        name: String,
        expected: GlslType,
        expected_size: i32,
        attempted_size: usize,
        value: String,
    },

    /// Resource handed to `set_texture` is not a texture
    WrongResourceKind {
        name: String,
        kind: ResourceKind,
    },

    /// A texture unit received a sampler type different from its previous one
    TextureUnitConflict {
        unit: u32,
        previous: GlslType,
        current: GlslType,
        name: String,
    },
}

impl Diagnostic {
    /// Uniform name the diagnostic is about
    pub fn name(&self) -> &str {
        match self {
            Diagnostic::UnlinkedProgram { name, .. }
            | Diagnostic::UnknownName { name, .. }
            | Diagnostic::TypeMismatch { name, .. }
            | Diagnostic::SizeMismatch { name, .. }
            | Diagnostic::WrongResourceKind { name, .. }
            | Diagnostic::TextureUnitConflict { name, .. } => name,
        }
    }

    /// True for the diagnostics that replaced a native call
    pub fn is_invalid_set(&self) -> bool {
        !matches!(self, Diagnostic::TextureUnitConflict { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnlinkedProgram { name, attempted, value } => write!(
                f,
                "set '{}' ({} = {}) on a program that is not linked",
                name, attempted, value
            ),
            Diagnostic::UnknownName { name, attempted, value } => write!(
                f,
                "'{}' is not an active uniform (attempted {} = {})",
                name, attempted, value
            ),
            Diagnostic::TypeMismatch { name, expected, expected_size, attempted, attempted_size, value } => write!(
                f,
                "'{}' is {}[{}], attempted {}[{}] = {}",
                name, expected, expected_size, attempted, attempted_size, value
            ),
            Diagnostic::SizeMismatch { name, expected, expected_size, attempted_size, value } => write!(
                f,
                "'{}' is {}[{}], attempted {} element(s) = {}",
                name, expected, expected_size, attempted_size, value
            ),
            Diagnostic::WrongResourceKind { name, kind } => write!(
                f,
                "'{}' needs a Texture, got a {}",
                name, kind
            ),
            Diagnostic::TextureUnitConflict { unit, previous, current, name } => write!(
                f,
                "texture unit {} switched sampler type from {} to {} (via '{}')",
                unit, previous, current, name
            ),
        }
    }
}
