//! JSON-line wire protocol between the runner and the driver subprocess
//!
//! One request per line on the driver's stdin, one reply per line on its
//! stdout, strictly in order.

use serde::{Deserialize, Serialize};

/// Request sent to the driver
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum DriverCommand {
    NewContext {
        width: u32,
        height: u32,
    },
    CloseContext {
        context_id: String,
    },
    NewPage {
        context_id: String,
    },
    Goto {
        page_id: String,
        url: String,
    },
    Click {
        page_id: String,
        selector: String,
        timeout_ms: u64,
    },
    Fill {
        page_id: String,
        selector: String,
        value: String,
        timeout_ms: u64,
    },
    Press {
        page_id: String,
        selector: String,
        key: String,
    },
    InnerText {
        page_id: String,
        selector: String,
        timeout_ms: u64,
    },
    Title {
        page_id: String,
    },
    IsVisible {
        page_id: String,
        selector: String,
    },
    WaitForSelector {
        page_id: String,
        selector: String,
        state: String,
        timeout_ms: u64,
    },
    SetChecked {
        page_id: String,
        selector: String,
        checked: bool,
    },
    Shutdown,
}

impl DriverCommand {
    /// Wire tag of this command, as the driver script matches on it
    pub fn tag(&self) -> &'static str {
        match self {
            DriverCommand::NewContext { .. } => "new_context",
            DriverCommand::CloseContext { .. } => "close_context",
            DriverCommand::NewPage { .. } => "new_page",
            DriverCommand::Goto { .. } => "goto",
            DriverCommand::Click { .. } => "click",
            DriverCommand::Fill { .. } => "fill",
            DriverCommand::Press { .. } => "press",
            DriverCommand::InnerText { .. } => "inner_text",
            DriverCommand::Title { .. } => "title",
            DriverCommand::IsVisible { .. } => "is_visible",
            DriverCommand::WaitForSelector { .. } => "wait_for_selector",
            DriverCommand::SetChecked { .. } => "set_checked",
            DriverCommand::Shutdown => "shutdown",
        }
    }
}

/// Reply from the driver
#[derive(Debug, Clone, Deserialize)]
pub struct DriverReply {
    pub ok: bool,

    #[serde(default)]
    pub value: Option<serde_json::Value>,

    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serializes_with_tag() {
        let cmd = DriverCommand::Click {
            page_id: "page-2".to_string(),
            selector: "#submit-login".to_string(),
            timeout_ms: 5000,
        };
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["cmd"], "click");
        assert_eq!(value["selector"], "#submit-login");
        assert_eq!(value["timeout_ms"], 5000);
    }

    #[test]
    fn test_tag_matches_serialized_form() {
        let cmd = DriverCommand::WaitForSelector {
            page_id: "page-1".to_string(),
            selector: "#index".to_string(),
            state: "visible".to_string(),
            timeout_ms: 5000,
        };
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["cmd"], cmd.tag());
    }

    #[test]
    fn test_reply_parses_error_form() {
        let reply: DriverReply =
            serde_json::from_str(r#"{"ok": false, "error": "Timeout 5000ms exceeded"}"#).unwrap();
        assert!(!reply.ok);
        assert_eq!(reply.error.as_deref(), Some("Timeout 5000ms exceeded"));
        assert!(reply.value.is_none());
    }
}
