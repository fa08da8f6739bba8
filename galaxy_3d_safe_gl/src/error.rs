//! Error types for Galaxy3D Safe GL
//!
//! Only configuration problems and native-layer failures surface as `Error`.
//! Uniform/attribute mismatches never do: they are recorded as program
//! diagnostics instead (see `shader::Diagnostic`).

use std::fmt;

use crate::shader_gen::AttributeUsage;

/// Result type for Galaxy3D Safe GL operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D Safe GL errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (GL driver, handle generation, etc.)
    BackendError(String),

    /// Invalid resource (wrong kind, unlinked program, etc.)
    InvalidResource(String),

    /// Initialization failed (engine singletons, device)
    InitializationFailed(String),

    /// A native call that needs a current context was attempted without one
    NoCurrentContext(String),

    /// Shader generation was asked for an empty attribute list
    EmptyAttributeList,

    /// Shader generation needs an attribute tagged with `usage`
    MissingAttributeUsage {
        usage: AttributeUsage,
        required_by: String,
    },

    /// Attribute descriptor rejected by the generator validation gate
    InvalidAttribute(String),

    /// Texture descriptor rejected by the generator validation gate
    InvalidTexture(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::NoCurrentContext(msg) => write!(f, "No current GL context: {}", msg),
            Error::EmptyAttributeList => {
                write!(f, "Invalid attribute list: at least one attribute descriptor is required")
            }
            Error::MissingAttributeUsage { usage, required_by } => write!(
                f,
                "Missing attribute: an attribute with usage '{}' is required by {}",
                usage, required_by
            ),
            Error::InvalidAttribute(msg) => write!(f, "Invalid attribute: {}", msg),
            Error::InvalidTexture(msg) => write!(f, "Invalid texture: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
