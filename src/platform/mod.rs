// Platform-specific code module

pub mod notifications;

pub use notifications::{default_sink, LogNotifier};
