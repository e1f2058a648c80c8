// glucmon library - public API

// Re-export error types
pub mod error;
pub use error::{GlucmonError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use core::config::{Config, SettingsStore};
pub use core::glucose::{evaluate, AlertDecision, AlertKind, MonitorPipeline, Reading};

// Initialize logging
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
