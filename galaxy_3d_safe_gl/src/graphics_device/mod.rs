/// Graphics device module - the native GL surface and the value types it exchanges

pub mod gl_device;
pub mod types;

pub use gl_device::*;
pub use types::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_gl_device;
