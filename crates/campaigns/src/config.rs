//! Campaign run configuration

use std::path::PathBuf;
use std::time::Duration;

use shoptest_mail::MailConfig;

/// Endpoints and credentials for the deployment under test
#[derive(Debug, Clone)]
pub struct CampaignConfig {
    /// Storefront base URL
    pub fo_url: String,

    /// Administration base URL
    pub bo_url: String,

    pub bo_email: String,
    pub bo_password: String,

    /// SMTP endpoint of the mail-capture service, as the platform sees it
    pub smtp_server: String,
    pub smtp_port: u16,

    /// Web API of the mail-capture service
    pub mail: MailConfig,

    /// Bound on waiting for a captured mail message
    pub mail_wait: Duration,

    /// Directory for the JSON campaign report
    pub output_dir: PathBuf,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            fo_url: "http://127.0.0.1:8080".to_string(),
            bo_url: "http://127.0.0.1:8080/admin-dev".to_string(),
            bo_email: "admin@shop.test".to_string(),
            bo_password: "admin-password".to_string(),
            smtp_server: "127.0.0.1".to_string(),
            smtp_port: 1025,
            mail: MailConfig::default(),
            mail_wait: Duration::from_secs(15),
            output_dir: PathBuf::from("test-results"),
        }
    }
}
