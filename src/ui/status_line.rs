//! Terminal status line for the watch loop.

use chrono::{DateTime, Local};
use colored::{ColoredString, Colorize};

use crate::core::glucose::{DisplaySink, DisplayState};

/// Colour a label according to its style class.
pub fn paint(text: &str, style_class: &str) -> ColoredString {
    match style_class {
        "urgent-high-glucose" | "urgent-low-glucose" => text.white().on_red().bold(),
        "high-glucose" => text.yellow().bold(),
        "low-glucose" => text.red().bold(),
        "expired-data" => text.bright_black().strikethrough(),
        _ => text.green().bold(),
    }
}

/// Format one status line: `[HH:MM:SS] 250 ↑  (high-glucose)`
pub fn format_status(state: &DisplayState, at: DateTime<Local>) -> String {
    format!(
        "{} {}  {}",
        format!("[{}]", at.format("%H:%M:%S")).dimmed(),
        paint(&state.text, &state.style_class),
        format!("({})", state.style_class).dimmed()
    )
}

/// When the terminal status prints a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    OnChange,
    Always,
    Never,
}

pub struct TerminalStatus {
    current: Option<DisplayState>,
    mode: PrintMode,
}

impl TerminalStatus {
    pub fn new(mode: PrintMode) -> Self {
        Self {
            current: None,
            mode,
        }
    }
}

impl DisplaySink for TerminalStatus {
    fn show(&mut self, state: &DisplayState) {
        let print = match self.mode {
            PrintMode::Always => true,
            PrintMode::OnChange => self.current.as_ref() != Some(state),
            PrintMode::Never => false,
        };
        if print {
            println!("{}", format_status(state, Local::now()));
        }
        self.current = Some(state.clone());
    }

    fn current(&self) -> Option<&DisplayState> {
        self.current.as_ref()
    }
}
