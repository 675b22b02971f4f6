//! Browsing-session lifecycle: one isolated context and tab per scenario

use tracing::{debug, warn};

use crate::driver::BrowserDriver;
use crate::error::{BrowserError, BrowserResult};
use crate::page::Page;
use crate::protocol::DriverCommand;

/// One isolated browsing context with one tab, owned by a single scenario.
///
/// `close` must run on every exit path (the scenario teardown phase calls it
/// whether or not the main body failed). A session dropped without `close`
/// is a leaked browsing context; it is logged loudly and the context only
/// goes away when the driver itself shuts down.
pub struct BrowserSession {
    driver: BrowserDriver,
    context_id: String,
    page: Page,
    closed: bool,
}

impl BrowserSession {
    /// Open a fresh context and tab on the given driver
    pub async fn acquire(driver: &BrowserDriver) -> BrowserResult<Self> {
        let config = driver.config();
        let context_id = as_string(
            driver
                .call(DriverCommand::NewContext {
                    width: config.viewport_width,
                    height: config.viewport_height,
                })
                .await?,
        )?;

        let page_id = as_string(
            driver
                .call(DriverCommand::NewPage {
                    context_id: context_id.clone(),
                })
                .await?,
        )?;

        debug!(context = %context_id, page = %page_id, "browsing session acquired");

        Ok(Self {
            driver: driver.clone(),
            context_id: context_id.clone(),
            page: Page::new(driver.clone(), page_id),
            closed: false,
        })
    }

    /// The session's tab
    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    /// Close the browsing context. Idempotent; an error here is surfaced to
    /// the caller, never swallowed.
    pub async fn close(&mut self) -> BrowserResult<()> {
        if self.closed {
            return Ok(());
        }

        self.driver
            .call(DriverCommand::CloseContext {
                context_id: self.context_id.clone(),
            })
            .await?;
        self.closed = true;

        debug!(context = %self.context_id, "browsing session released");
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if !self.closed {
            warn!(
                context = %self.context_id,
                "browsing context leaked: close() was not called before drop"
            );
        }
    }
}

fn as_string(value: serde_json::Value) -> BrowserResult<String> {
    value
        .as_str()
        .map(String::from)
        .ok_or_else(|| BrowserError::Protocol("expected string reply".to_string()))
}
