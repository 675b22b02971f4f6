//! Captured mail message as exposed by the MailDev REST API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One captured email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailMessage {
    /// MailDev-assigned message id
    pub id: String,

    #[serde(default)]
    pub subject: String,

    /// Plain-text body
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub to: Vec<MailAddress>,

    /// Capture timestamp, when the service provides one
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailAddress {
    pub address: String,

    #[serde(default)]
    pub name: String,
}

impl MailMessage {
    /// Whether any recipient matches `address` (case-insensitive)
    pub fn is_addressed_to(&self, address: &str) -> bool {
        self.to
            .iter()
            .any(|to| to.address.eq_ignore_ascii_case(address))
    }
}
