//! Mail listener bridge
//!
//! Subscribes to a MailDev mail-capture service and exposes newly arrived
//! messages to a running scenario through an awaitable channel with a
//! bounded wait, instead of an open-ended callback subscription.
//!
//! Correlation caveat: messages are handed out in arrival order; nothing
//! ties a message to the UI action that produced it. A step expecting a
//! message must start the listener before triggering the action, and a
//! delivery delayed past the bounded wait surfaces as a timeout error
//! rather than the wrong message being silently consumed later.

pub mod error;
pub mod listener;
pub mod message;

pub use error::{MailError, MailResult};
pub use listener::{MailConfig, MailListener};
pub use message::{MailAddress, MailMessage};
