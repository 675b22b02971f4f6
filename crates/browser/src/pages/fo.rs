//! Storefront (front-office) page objects

use crate::error::BrowserResult;
use crate::page::{Page, WaitState};

/// Storefront home page
pub struct FoHomePage;

impl FoHomePage {
    const HOME_BODY: &'static str = "#index";
    const USER_INFO_LINK: &'static str = "#_desktop_user_info a";

    pub async fn goto(page: &Page, base_url: &str) -> BrowserResult<()> {
        page.goto(base_url).await?;
        page.wait_for_selector("body", WaitState::Visible).await
    }

    pub async fn is_home_page(page: &Page) -> BrowserResult<bool> {
        page.is_visible(Self::HOME_BODY).await
    }

    pub async fn go_to_login_page(page: &Page) -> BrowserResult<()> {
        page.click(Self::USER_INFO_LINK).await
    }
}

/// Storefront login page
pub struct FoLoginPage;

impl FoLoginPage {
    pub const PAGE_TITLE: &'static str = "Login";
    pub const LOGIN_ERROR_TEXT: &'static str = "Authentication failed";

    const EMAIL_INPUT: &'static str = "#login-form input[name='email']";
    const PASSWORD_INPUT: &'static str = "#login-form input[name='password']";
    const SUBMIT_BUTTON: &'static str = "#submit-login";
    const ERROR_ALERT: &'static str = "#content section.login-form .help-block li.alert-danger";
    const FORGOT_PASSWORD_LINK: &'static str = ".forgot-password a";
    const NO_ACCOUNT_LINK: &'static str = ".no-account a";

    pub async fn get_page_title(page: &Page) -> BrowserResult<String> {
        page.title().await
    }

    /// Submit the login form. Callers check the outcome themselves: a failed
    /// login stays on this page with an error alert.
    pub async fn login(page: &Page, email: &str, password: &str) -> BrowserResult<()> {
        page.fill(Self::EMAIL_INPUT, email).await?;
        page.fill(Self::PASSWORD_INPUT, password).await?;
        page.click(Self::SUBMIT_BUTTON).await
    }

    pub async fn get_login_error(page: &Page) -> BrowserResult<String> {
        page.inner_text(Self::ERROR_ALERT).await
    }

    pub async fn go_to_password_reminder_page(page: &Page) -> BrowserResult<()> {
        page.click(Self::FORGOT_PASSWORD_LINK).await
    }

    pub async fn go_to_register_page(page: &Page) -> BrowserResult<()> {
        page.click(Self::NO_ACCOUNT_LINK).await
    }
}

/// Storefront account creation page
pub struct FoRegisterPage;

impl FoRegisterPage {
    const FIRSTNAME_INPUT: &'static str = "#customer-form input[name='firstname']";
    const LASTNAME_INPUT: &'static str = "#customer-form input[name='lastname']";
    const EMAIL_INPUT: &'static str = "#customer-form input[name='email']";
    const PASSWORD_INPUT: &'static str = "#customer-form input[name='password']";
    const TERMS_CHECKBOX: &'static str = "#customer-form input[name='psgdpr']";
    const SUBMIT_BUTTON: &'static str = "#customer-form button[type='submit']";

    pub async fn create_account(
        page: &Page,
        firstname: &str,
        lastname: &str,
        email: &str,
        password: &str,
    ) -> BrowserResult<()> {
        page.fill(Self::FIRSTNAME_INPUT, firstname).await?;
        page.fill(Self::LASTNAME_INPUT, lastname).await?;
        page.fill(Self::EMAIL_INPUT, email).await?;
        page.fill(Self::PASSWORD_INPUT, password).await?;
        page.set_checked(Self::TERMS_CHECKBOX, true).await?;
        page.click(Self::SUBMIT_BUTTON).await
    }
}

/// Storefront "my account" page
pub struct FoMyAccountPage;

impl FoMyAccountPage {
    pub const PAGE_TITLE: &'static str = "My account";
    pub const RESET_PASSWORD_SUCCESS_MESSAGE: &'static str =
        "Your password has been successfully reset";

    const ACCOUNT_BODY: &'static str = "#my-account";
    const CONNECTED_ACCOUNT_LINK: &'static str = "#_desktop_user_info .account";
    const LOGOUT_LINK: &'static str = "#_desktop_user_info .logout";
    const SUCCESS_ALERT: &'static str = ".notifications-container .alert-success";

    pub async fn is_customer_connected(page: &Page) -> BrowserResult<bool> {
        page.is_visible(Self::CONNECTED_ACCOUNT_LINK).await
    }

    pub async fn is_account_page(page: &Page) -> BrowserResult<bool> {
        page.is_visible(Self::ACCOUNT_BODY).await
    }

    pub async fn logout(page: &Page) -> BrowserResult<()> {
        page.click(Self::LOGOUT_LINK).await
    }

    pub async fn get_success_message(page: &Page) -> BrowserResult<String> {
        page.inner_text(Self::SUCCESS_ALERT).await
    }
}

/// Storefront password reminder / reset page
pub struct FoPasswordReminderPage;

impl FoPasswordReminderPage {
    pub const PAGE_TITLE: &'static str = "Forgot your password";
    pub const ERROR_REGENERATION_MESSAGE: &'static str =
        "You can regenerate your password only every";

    const EMAIL_INPUT: &'static str = ".forgotten-password input[name='email']";
    const SEND_BUTTON: &'static str = ".forgotten-password button[type='submit']";
    const SUCCESS_ALERT: &'static str = ".forgotten-password .ps-alert-success";
    const ERROR_ALERT: &'static str = ".forgotten-password .alert-danger";
    const RESET_EMAIL_LABEL: &'static str = ".email .form-control-static";
    const NEW_PASSWORD_INPUT: &'static str = "#reset-password input[name='passwd']";
    const CONFIRM_PASSWORD_INPUT: &'static str = "#reset-password input[name='confirmation']";
    const SUBMIT_RESET_BUTTON: &'static str = "#reset-password button[type='submit']";

    pub async fn send_reset_link(page: &Page, email: &str) -> BrowserResult<()> {
        page.fill(Self::EMAIL_INPUT, email).await?;
        page.click(Self::SEND_BUTTON).await?;
        page.wait_for_selector(Self::SUCCESS_ALERT, WaitState::Visible)
            .await
    }

    pub async fn get_success_alert(page: &Page) -> BrowserResult<String> {
        page.inner_text(Self::SUCCESS_ALERT).await
    }

    pub async fn get_error_message(page: &Page) -> BrowserResult<String> {
        page.inner_text(Self::ERROR_ALERT).await
    }

    /// Email address shown on the reset form after following the mail link
    pub async fn get_email_to_reset(page: &Page) -> BrowserResult<String> {
        page.inner_text(Self::RESET_EMAIL_LABEL).await
    }

    pub async fn set_new_password(page: &Page, new_password: &str) -> BrowserResult<()> {
        page.fill(Self::NEW_PASSWORD_INPUT, new_password).await?;
        page.fill(Self::CONFIRM_PASSWORD_INPUT, new_password).await?;
        page.click(Self::SUBMIT_RESET_BUTTON).await
    }
}
