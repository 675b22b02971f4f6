//! Browser session management
//!
//! Drives a real browser through a long-lived Playwright driver subprocess
//! (node) speaking a JSON-line protocol over stdin/stdout. One
//! [`BrowserSession`] holds one isolated browsing context and one tab, owned
//! by exactly one scenario and released in its teardown phase.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  BrowserDriver (node + playwright, one per campaign run) │
//! │    ├── BrowserSession::acquire() -> (context, page)      │
//! │    │     └── Page: goto / click / fill / inner_text /    │
//! │    │         title / wait_for_selector / ...             │
//! │    └── shutdown() -> SIGTERM, then kill                  │
//! ├──────────────────────────────────────────────────────────┤
//! │  pages::fo / pages::bo                                   │
//! │    semantic operations per logical screen, built on Page │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod driver;
pub mod error;
pub mod page;
pub mod pages;
pub mod protocol;
pub mod session;

pub use driver::{BrowserConfig, BrowserDriver, BrowserKind};
pub use error::{BrowserError, BrowserResult};
pub use page::{Page, WaitState};
pub use session::BrowserSession;
