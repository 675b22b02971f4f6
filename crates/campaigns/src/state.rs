//! Per-scenario state shared between steps

use shoptest_browser::{BrowserSession, Page};
use shoptest_harness::{ScenarioCx, StepError, StepResult};
use shoptest_mail::{MailListener, MailMessage};

/// Everything a step may need or capture: the browsing session, the mail
/// listener, and values produced by earlier steps. One instance per
/// scenario, passed by `&mut` into every step.
#[derive(Default)]
pub struct ShopState {
    pub session: Option<BrowserSession>,
    pub mail: Option<MailListener>,

    /// Message captured by the mail-assertion step for later steps
    pub captured_mail: Option<MailMessage>,
}

pub type Cx = ScenarioCx<ShopState>;

impl ShopState {
    /// The session's tab; fails as an action error when no session fixture
    /// ran (a step must never outlive or precede its browsing context).
    pub fn page(&self) -> StepResult<Page> {
        self.session
            .as_ref()
            .map(|session| session.page().clone())
            .ok_or_else(|| StepError::Action("browsing session not acquired".to_string()))
    }

    pub fn mail_mut(&mut self) -> StepResult<&mut MailListener> {
        self.mail
            .as_mut()
            .ok_or_else(|| StepError::Action("mail listener not started".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_session_is_an_action_error() {
        let state = ShopState::default();
        let err = state.page().unwrap_err();
        assert!(!err.is_assertion());
        assert!(err.to_string().contains("browsing session"));
    }
}
