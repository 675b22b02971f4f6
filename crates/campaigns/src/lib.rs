//! Functional campaigns for a storefront deployment
//!
//! Each campaign composes fixtures and steps from the harness into one
//! scenario against a live storefront (FO) and its administration (BO):
//!
//! - `password_reminder`: reset a customer password through the emailed
//!   link, with SMTP capture and a created account as pre-conditions.
//! - `customer_filter`: create a customer, assert the admin grid finds it
//!   when filtered by name, delete it again in teardown.
//! - `merchandise_returns`: toggle the returns feature on as a
//!   pre-condition, verify it, restore it in teardown.
//!
//! The campaigns run through the `campaigns` test binary (harness = false),
//! which spawns one Playwright driver for the whole run and writes a JSON
//! campaign report.

pub mod config;
pub mod customer_filter;
pub mod data;
pub mod fixtures;
pub mod merchandise_returns;
pub mod password_reminder;
pub mod state;

pub use config::CampaignConfig;
pub use data::CustomerData;
pub use state::{Cx, ShopState};

use shoptest_browser::BrowserDriver;
use shoptest_harness::Scenario;

/// A campaign ready to run: the scenario plus its initial state
pub type PreparedCampaign = (Scenario<ShopState>, ShopState);

/// All shipped campaigns, keyed by CLI name
pub fn all(driver: &BrowserDriver, cfg: &CampaignConfig) -> Vec<(&'static str, PreparedCampaign)> {
    vec![
        ("password-reminder", password_reminder::campaign(driver, cfg)),
        ("customer-filter", customer_filter::campaign(driver, cfg)),
        ("merchandise-returns", merchandise_returns::campaign(driver, cfg)),
    ]
}
