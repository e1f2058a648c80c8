// Core monitoring logic

pub mod config;
pub mod glucose;

// Re-export commonly used items
pub use config::{Config, SettingsStore, SharedConfig};
