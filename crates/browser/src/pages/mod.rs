//! Page objects: semantic operations over one logical UI screen
//!
//! Each type wraps raw page interaction behind operations named after what
//! the user does ("login", "filter by name", "send reset link"). Scenarios
//! assert on the values these return; page objects never assert themselves.

pub mod bo;
pub mod fo;

pub use bo::{
    BoCustomersPage, BoDashboardPage, BoLoginPage, BoMailSettingsPage, BoMerchandiseReturnsPage,
};
pub use fo::{FoHomePage, FoLoginPage, FoMyAccountPage, FoPasswordReminderPage, FoRegisterPage};
