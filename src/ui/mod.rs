// UI and formatting module

pub mod prompts;
pub mod status_line;

// Re-export commonly used items for cleaner imports
pub use prompts::{config_problems, confirm, dimmed, error, success};
pub use status_line::{format_status, paint, PrintMode, TerminalStatus};
