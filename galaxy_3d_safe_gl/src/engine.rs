/// Galaxy3D Safe GL - global logger and resource registry singleton
///
/// The logger slot is always available (initialized with `DefaultLogger` on
/// first use). The resource registry singleton is optional: applications may
/// create their own `ResourceRegistry` and pass it around instead.

use std::sync::{Arc, OnceLock, RwLock};
use std::time::SystemTime;

use crate::error::{Error, Result};
use crate::graphics_device::GlDevice;
use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
use crate::resource::ResourceRegistry;

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Internal state structure holding all engine singletons
struct EngineState {
    /// Resource registry singleton
    registry: RwLock<Option<Arc<ResourceRegistry>>>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            registry: RwLock::new(None),
        }
    }
}

// ===== PUBLIC API =====

/// Engine singleton manager
///
/// ```ignore
/// use galaxy_3d_safe_gl::galaxy3d::Engine;
///
/// Engine::initialize()?;
/// let registry = Engine::create_registry()?;
///
/// // once per frame, with the GL context current
/// Engine::sweep(&mut device)?;
///
/// Engine::shutdown();
/// ```
pub struct Engine;

impl Engine {
    /// Log an Engine error before returning it
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::InitializationFailed(msg) => {
                crate::engine_error!("galaxy3d::Engine", "Initialization failed: {}", msg);
            }
            Error::BackendError(msg) => {
                crate::engine_error!("galaxy3d::Engine", "Backend error: {}", msg);
            }
            _ => {
                crate::engine_error!("galaxy3d::Engine", "Engine error: {}", error);
            }
        }
        error
    }

    fn state() -> Result<&'static EngineState> {
        ENGINE_STATE.get().ok_or_else(|| Self::log_and_return_error(
            Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
        ))
    }

    /// Initialize the engine (idempotent)
    ///
    /// # Errors
    ///
    /// Currently always succeeds.
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(EngineState::new);
        Ok(())
    }

    /// Drop the registry singleton
    ///
    /// Handles it still tracks are leaked unless the caller swept them first
    /// (see `Engine::sweep`). Resources held elsewhere keep the registry
    /// alive until they are dropped.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut registry) = state.registry.write() {
                *registry = None;
            }
        }
    }

    // ===== RESOURCE REGISTRY API =====

    /// Create and register the registry singleton
    ///
    /// # Errors
    ///
    /// - The engine is not initialized
    /// - A registry already exists
    /// - The registry lock is poisoned
    pub fn create_registry() -> Result<Arc<ResourceRegistry>> {
        let state = Self::state()?;

        let mut lock = state.registry.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("ResourceRegistry lock poisoned".to_string())
            ))?;

        if lock.is_some() {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed("ResourceRegistry already exists. Call Engine::destroy_registry() first.".to_string())
            ));
        }

        let registry = ResourceRegistry::new();
        *lock = Some(Arc::clone(&registry));

        crate::engine_info!("galaxy3d::Engine", "ResourceRegistry singleton created successfully");

        Ok(registry)
    }

    /// Get the registry singleton
    ///
    /// # Errors
    ///
    /// - The engine is not initialized
    /// - The registry has not been created
    pub fn registry() -> Result<Arc<ResourceRegistry>> {
        let state = Self::state()?;

        let lock = state.registry.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("ResourceRegistry lock poisoned".to_string())
            ))?;

        lock.clone()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("ResourceRegistry not created. Call Engine::create_registry() first.".to_string())
            ))
    }

    /// Remove the registry singleton
    ///
    /// Existing `Arc`s to it stay valid.
    pub fn destroy_registry() -> Result<()> {
        let state = Self::state()?;

        let mut lock = state.registry.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("ResourceRegistry lock poisoned".to_string())
            ))?;

        *lock = None;

        crate::engine_info!("galaxy3d::Engine", "ResourceRegistry singleton destroyed");

        Ok(())
    }

    /// Sweep the registry singleton
    ///
    /// Must be called with the GL context current on the calling thread.
    ///
    /// # Returns
    ///
    /// The number of native deletes issued
    pub fn sweep(device: &mut dyn GlDevice) -> Result<usize> {
        Ok(Self::registry()?.sweep(device))
    }

    /// Reset all singletons for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut registry) = state.registry.write() {
                *registry = None;
            }
        }
    }

    // ===== LOGGING API =====

    /// Replace the logger (file logger, test capture, ...)
    ///
    /// ```ignore
    /// use galaxy_3d_safe_gl::galaxy3d::{Engine, log::{Logger, LogEntry}};
    ///
    /// struct FileLogger;
    /// impl Logger for FileLogger {
    ///     fn log(&self, entry: &LogEntry) {
    ///         // Write to file...
    ///     }
    /// }
    ///
    /// Engine::set_logger(FileLogger);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Log without file:line (used by engine_trace! .. engine_warn!)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Log with file:line (used by engine_error!)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
