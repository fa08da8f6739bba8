/// Handle - identity of one native GL object

use std::fmt;

use crate::graphics_device::ResourceKind;

/// `(kind, name)` pair identifying one native GL object
///
/// Created once by the registry and never mutated. Two handles are equal
/// only if both the kind and the GL name match: a buffer and a texture may
/// share the same integer name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    kind: ResourceKind,
    id: u32,
}

impl Handle {
    pub fn new(kind: ResourceKind, id: u32) -> Self {
        Self { kind, id }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Raw GL object name
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}
