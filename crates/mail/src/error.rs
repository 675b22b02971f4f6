//! Error types for the mail bridge

use thiserror::Error;

pub type MailResult<T> = std::result::Result<T, MailError>;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Timed out after {ms}ms waiting for a mail message")]
    Timeout { ms: u64 },

    #[error("Mail listener is stopped")]
    ListenerStopped,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<MailError> for shoptest_harness::StepError {
    fn from(e: MailError) -> Self {
        shoptest_harness::StepError::Action(e.to_string())
    }
}
