use std::io;
use thiserror::Error;

/// Custom error type for glucmon
#[derive(Error, Debug)]
pub enum GlucmonError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Network failure, request timeout or a non-200 answer from the feed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Feed body that cannot be turned into a reading.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Notification source unavailable: {0}")]
    NotificationSource(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Scheduler error: {0}")]
    Scheduler(String),
}

/// Result type alias for glucmon
pub type Result<T> = std::result::Result<T, GlucmonError>;

impl From<reqwest::Error> for GlucmonError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GlucmonError::Transport(format!("request timed out: {}", err))
        } else if let Some(status) = err.status() {
            GlucmonError::Transport(format!("feed returned HTTP {}", status.as_u16()))
        } else {
            GlucmonError::Transport(err.to_string())
        }
    }
}

impl GlucmonError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        GlucmonError::Config(msg.into())
    }

    /// Create a transport error
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        GlucmonError::Transport(msg.into())
    }

    /// Create a parse error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        GlucmonError::Parse(msg.into())
    }

    pub fn notification_source<S: Into<String>>(msg: S) -> Self {
        GlucmonError::NotificationSource(msg.into())
    }

    pub fn notification<S: Into<String>>(msg: S) -> Self {
        GlucmonError::Notification(msg.into())
    }

    pub fn scheduler<S: Into<String>>(msg: S) -> Self {
        GlucmonError::Scheduler(msg.into())
    }
}
