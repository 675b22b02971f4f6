//! Error types for browser automation

use thiserror::Error;

pub type BrowserResult<T> = std::result::Result<T, BrowserError>;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Playwright not found. Install with: npx playwright install")]
    PlaywrightNotFound,

    #[error("Driver failed to start: {0}")]
    DriverStartup(String),

    #[error("Driver protocol error: {0}")]
    Protocol(String),

    #[error("Driver process exited unexpectedly")]
    DriverGone,

    #[error("Action '{action}' failed on {target}: {reason}")]
    Action {
        action: String,
        target: String,
        reason: String,
    },

    #[error("Timed out waiting for: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<BrowserError> for shoptest_harness::StepError {
    fn from(e: BrowserError) -> Self {
        shoptest_harness::StepError::Action(e.to_string())
    }
}
