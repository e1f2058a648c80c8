//! Status label contract.

use serde::Serialize;

use super::alerts::AlertDecision;

pub const NO_DATA_TEXT: &str = "No data";
pub const LOADING_TEXT: &str = "Loading...";

/// Text and style class of the status label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    pub text: String,
    pub style_class: String,
}

impl DisplayState {
    pub fn loading() -> Self {
        Self {
            text: LOADING_TEXT.to_string(),
            style_class: super::alerts::STYLE_FRESH.to_string(),
        }
    }

    /// Shown when the feed answered but held no usable reading.
    /// The style class is left as it was.
    pub fn no_data(previous_style: &str) -> Self {
        Self {
            text: NO_DATA_TEXT.to_string(),
            style_class: previous_style.to_string(),
        }
    }
}

impl From<&AlertDecision> for DisplayState {
    fn from(decision: &AlertDecision) -> Self {
        Self {
            text: decision.display_text.clone(),
            style_class: decision.style_class.clone(),
        }
    }
}

/// Consumer of the per-cycle status.
pub trait DisplaySink: Send {
    fn show(&mut self, state: &DisplayState);

    /// Last state shown, if any.
    fn current(&self) -> Option<&DisplayState>;
}
