//! Browser error types.

use thiserror::Error;

/// Errors that can occur during browser operations, tagged by stage.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("browser not available: Chrome/Chromium not found. {0}")]
    BrowserNotAvailable(String),

    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    #[error("JavaScript evaluation failed: {0}")]
    JsEvalFailed(String),

    #[error("no audit slots available")]
    PoolExhausted,
}
