//! Shader stages, linked programs and validated uniform access

mod diagnostic;
mod program;
mod shader;
mod uniform;
mod vertex_layout;

pub use diagnostic::Diagnostic;
pub use program::{DiagnosticObserver, ShaderProgram, VariableInfo};
pub use shader::Shader;
pub use uniform::UniformValue;
pub use vertex_layout::{VertexLayout, VertexLayoutEntry};
