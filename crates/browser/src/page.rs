//! Raw page capabilities consumed by the page-object layer

use crate::driver::BrowserDriver;
use crate::error::{BrowserError, BrowserResult};
use crate::protocol::DriverCommand;

/// Element state to wait for
#[derive(Debug, Clone, Copy, Default)]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

impl WaitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitState::Visible => "visible",
            WaitState::Hidden => "hidden",
            WaitState::Attached => "attached",
            WaitState::Detached => "detached",
        }
    }
}

/// One browser tab.
///
/// Every operation is bounded by the driver's action timeout; exceeding it
/// surfaces as an action error naming the selector.
#[derive(Clone)]
pub struct Page {
    driver: BrowserDriver,
    id: String,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page").field("id", &self.id).finish()
    }
}

impl Page {
    pub(crate) fn new(driver: BrowserDriver, id: String) -> Self {
        Self { driver, id }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn goto(&self, url: &str) -> BrowserResult<()> {
        self.driver
            .call(DriverCommand::Goto {
                page_id: self.id.clone(),
                url: url.to_string(),
            })
            .await
            .map_err(|e| action_error("goto", url, e))?;
        Ok(())
    }

    pub async fn click(&self, selector: &str) -> BrowserResult<()> {
        self.driver
            .call(DriverCommand::Click {
                page_id: self.id.clone(),
                selector: selector.to_string(),
                timeout_ms: self.driver.action_timeout_ms(),
            })
            .await
            .map_err(|e| action_error("click", selector, e))?;
        Ok(())
    }

    pub async fn fill(&self, selector: &str, value: &str) -> BrowserResult<()> {
        self.driver
            .call(DriverCommand::Fill {
                page_id: self.id.clone(),
                selector: selector.to_string(),
                value: value.to_string(),
                timeout_ms: self.driver.action_timeout_ms(),
            })
            .await
            .map_err(|e| action_error("fill", selector, e))?;
        Ok(())
    }

    pub async fn press(&self, selector: &str, key: &str) -> BrowserResult<()> {
        self.driver
            .call(DriverCommand::Press {
                page_id: self.id.clone(),
                selector: selector.to_string(),
                key: key.to_string(),
            })
            .await
            .map_err(|e| action_error("press", selector, e))?;
        Ok(())
    }

    pub async fn inner_text(&self, selector: &str) -> BrowserResult<String> {
        let value = self
            .driver
            .call(DriverCommand::InnerText {
                page_id: self.id.clone(),
                selector: selector.to_string(),
                timeout_ms: self.driver.action_timeout_ms(),
            })
            .await
            .map_err(|e| action_error("inner_text", selector, e))?;
        as_string(value)
    }

    /// Browser tab title
    pub async fn title(&self) -> BrowserResult<String> {
        let value = self
            .driver
            .call(DriverCommand::Title {
                page_id: self.id.clone(),
            })
            .await?;
        as_string(value)
    }

    pub async fn is_visible(&self, selector: &str) -> BrowserResult<bool> {
        let value = self
            .driver
            .call(DriverCommand::IsVisible {
                page_id: self.id.clone(),
                selector: selector.to_string(),
            })
            .await
            .map_err(|e| action_error("is_visible", selector, e))?;
        value
            .as_bool()
            .ok_or_else(|| BrowserError::Protocol("expected boolean reply".to_string()))
    }

    pub async fn wait_for_selector(&self, selector: &str, state: WaitState) -> BrowserResult<()> {
        self.driver
            .call(DriverCommand::WaitForSelector {
                page_id: self.id.clone(),
                selector: selector.to_string(),
                state: state.as_str().to_string(),
                timeout_ms: self.driver.action_timeout_ms(),
            })
            .await
            .map_err(|e| wait_error(selector, e))?;
        Ok(())
    }

    pub async fn set_checked(&self, selector: &str, checked: bool) -> BrowserResult<()> {
        self.driver
            .call(DriverCommand::SetChecked {
                page_id: self.id.clone(),
                selector: selector.to_string(),
                checked,
            })
            .await
            .map_err(|e| action_error("set_checked", selector, e))?;
        Ok(())
    }
}

/// Only replies that report an expired wait become timeouts; any other
/// driver failure (unknown page, bad selector) stays an action error.
fn wait_error(selector: &str, e: BrowserError) -> BrowserError {
    match e {
        BrowserError::Protocol(reason) if reason.contains("Timeout") => {
            BrowserError::Timeout(selector.to_string())
        }
        other => action_error("wait_for_selector", selector, other),
    }
}

fn action_error(action: &str, target: &str, e: BrowserError) -> BrowserError {
    match e {
        BrowserError::Protocol(reason) => BrowserError::Action {
            action: action.to_string(),
            target: target.to_string(),
            reason,
        },
        other => other,
    }
}

fn as_string(value: serde_json::Value) -> BrowserResult<String> {
    value
        .as_str()
        .map(String::from)
        .ok_or_else(|| BrowserError::Protocol("expected string reply".to_string()))
}
