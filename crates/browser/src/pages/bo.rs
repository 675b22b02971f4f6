//! Administration (back-office) page objects

use crate::error::BrowserResult;
use crate::page::{Page, WaitState};

/// Back-office login page
pub struct BoLoginPage;

impl BoLoginPage {
    const EMAIL_INPUT: &'static str = "#email";
    const PASSWORD_INPUT: &'static str = "#passwd";
    const SUBMIT_BUTTON: &'static str = "#submit_login";

    pub async fn goto(page: &Page, bo_url: &str) -> BrowserResult<()> {
        page.goto(bo_url).await?;
        page.wait_for_selector(Self::EMAIL_INPUT, WaitState::Visible)
            .await
    }

    pub async fn login(page: &Page, email: &str, password: &str) -> BrowserResult<()> {
        page.fill(Self::EMAIL_INPUT, email).await?;
        page.fill(Self::PASSWORD_INPUT, password).await?;
        page.click(Self::SUBMIT_BUTTON).await?;
        page.wait_for_selector(BoDashboardPage::PAGE_BODY, WaitState::Visible)
            .await
    }
}

/// Back-office dashboard with the main navigation menu
pub struct BoDashboardPage;

impl BoDashboardPage {
    pub const PAGE_TITLE: &'static str = "Dashboard";
    pub(crate) const PAGE_BODY: &'static str = "#main-div .page-head";

    pub const CUSTOMER_SERVICE_PARENT_LINK: &'static str = "#subtab-AdminParentCustomerThreads";
    pub const MERCHANDISE_RETURNS_LINK: &'static str = "#subtab-AdminReturn";
    pub const CUSTOMERS_PARENT_LINK: &'static str = "#subtab-AdminParentCustomer";
    pub const CUSTOMERS_LINK: &'static str = "#subtab-AdminCustomers";
    pub const ADVANCED_PARAMS_PARENT_LINK: &'static str = "#subtab-AdminAdvancedParameters";
    pub const EMAIL_LINK: &'static str = "#subtab-AdminEmails";

    pub async fn get_page_title(page: &Page) -> BrowserResult<String> {
        page.inner_text(".page-title").await
    }

    /// Open a page through the navigation menu
    pub async fn go_to_sub_menu(
        page: &Page,
        parent_selector: &str,
        link_selector: &str,
    ) -> BrowserResult<()> {
        page.click(parent_selector).await?;
        page.wait_for_selector(link_selector, WaitState::Visible)
            .await?;
        page.click(link_selector).await
    }
}

/// Back-office merchandise returns configuration
pub struct BoMerchandiseReturnsPage;

impl BoMerchandiseReturnsPage {
    pub const PAGE_TITLE: &'static str = "Merchandise Returns";
    pub const SUCCESSFUL_UPDATE_MESSAGE: &'static str = "Update successful";

    const ENABLE_RETURNS_ON: &'static str = "#form_enable_order_return_1";
    const ENABLE_RETURNS_OFF: &'static str = "#form_enable_order_return_0";
    const SAVE_BUTTON: &'static str = "#form-order-return-options .card-footer button";
    const SUCCESS_ALERT: &'static str = ".alert-success";

    pub async fn get_page_title(page: &Page) -> BrowserResult<String> {
        page.inner_text(".page-title").await
    }

    /// Whether the returns feature is currently shown as enabled
    pub async fn is_returns_enabled(page: &Page) -> BrowserResult<bool> {
        page.is_visible(&format!("{}:checked", Self::ENABLE_RETURNS_ON))
            .await
    }

    /// Toggle the returns flag and save; returns the alert text
    pub async fn set_returns_enabled(page: &Page, enabled: bool) -> BrowserResult<String> {
        let toggle = if enabled {
            Self::ENABLE_RETURNS_ON
        } else {
            Self::ENABLE_RETURNS_OFF
        };
        page.click(toggle).await?;
        page.click(Self::SAVE_BUTTON).await?;
        page.wait_for_selector(Self::SUCCESS_ALERT, WaitState::Visible)
            .await?;
        page.inner_text(Self::SUCCESS_ALERT).await
    }
}

/// Back-office customers grid
pub struct BoCustomersPage;

impl BoCustomersPage {
    pub const PAGE_TITLE: &'static str = "Customers";

    const FILTER_LASTNAME_INPUT: &'static str = "#customer_last_name";
    const SEARCH_BUTTON: &'static str = ".grid-search-button";
    const RESET_BUTTON: &'static str = ".grid-reset-button";
    const GRID_TABLE: &'static str = "#customer_grid_table";
    const FIRST_ROW: &'static str = "#customer_grid_table tbody tr:first-child";
    const FIRST_ROW_LASTNAME: &'static str =
        "#customer_grid_table tbody tr:first-child td.column-last_name";
    const EMPTY_ROW: &'static str = "#customer_grid_table .empty_row";
    const FIRST_ROW_DROPDOWN: &'static str =
        "#customer_grid_table tbody tr:first-child .dropdown-toggle";
    const FIRST_ROW_DELETE_LINK: &'static str =
        "#customer_grid_table tbody tr:first-child .grid-delete-row-link";
    const DELETE_CONFIRM_BUTTON: &'static str = "#customer_grid_delete_forever";
    const SUCCESS_ALERT: &'static str = ".alert-success";

    pub async fn get_page_title(page: &Page) -> BrowserResult<String> {
        page.inner_text(".page-title").await
    }

    /// Filter the grid by last name
    pub async fn filter_by_last_name(page: &Page, last_name: &str) -> BrowserResult<()> {
        page.fill(Self::FILTER_LASTNAME_INPUT, last_name).await?;
        page.click(Self::SEARCH_BUTTON).await?;
        page.wait_for_selector(Self::GRID_TABLE, WaitState::Visible)
            .await
    }

    pub async fn reset_filter(page: &Page) -> BrowserResult<()> {
        page.click(Self::RESET_BUTTON).await
    }

    /// Last name shown in the first result row
    pub async fn get_first_row_last_name(page: &Page) -> BrowserResult<String> {
        page.inner_text(Self::FIRST_ROW_LASTNAME).await
    }

    pub async fn is_grid_empty(page: &Page) -> BrowserResult<bool> {
        page.is_visible(Self::EMPTY_ROW).await
    }

    pub async fn has_results(page: &Page) -> BrowserResult<bool> {
        page.is_visible(Self::FIRST_ROW).await
    }

    /// Delete the first filtered row; returns the alert text
    pub async fn delete_first_row(page: &Page) -> BrowserResult<String> {
        page.click(Self::FIRST_ROW_DROPDOWN).await?;
        page.click(Self::FIRST_ROW_DELETE_LINK).await?;
        page.click(Self::DELETE_CONFIRM_BUTTON).await?;
        page.wait_for_selector(Self::SUCCESS_ALERT, WaitState::Visible)
            .await?;
        page.inner_text(Self::SUCCESS_ALERT).await
    }
}

/// Back-office email (SMTP) settings
pub struct BoMailSettingsPage;

impl BoMailSettingsPage {
    pub const PAGE_TITLE: &'static str = "E-mail";
    pub const SUCCESSFUL_UPDATE_MESSAGE: &'static str = "Update successful";

    const USE_SMTP_RADIO: &'static str = "#form_mail_method_2";
    const USE_PHP_MAIL_RADIO: &'static str = "#form_mail_method_0";
    const SMTP_SERVER_INPUT: &'static str = "#form_smtp_config_server";
    const SMTP_PORT_INPUT: &'static str = "#form_smtp_config_port";
    const SAVE_BUTTON: &'static str = "#form-email-save-button";
    const SUCCESS_ALERT: &'static str = ".alert-success";

    pub async fn get_page_title(page: &Page) -> BrowserResult<String> {
        page.inner_text(".page-title").await
    }

    /// Point outgoing mail at an SMTP capture service; returns the alert text
    pub async fn setup_smtp(page: &Page, server: &str, port: u16) -> BrowserResult<String> {
        page.click(Self::USE_SMTP_RADIO).await?;
        page.fill(Self::SMTP_SERVER_INPUT, server).await?;
        page.fill(Self::SMTP_PORT_INPUT, &port.to_string()).await?;
        page.click(Self::SAVE_BUTTON).await?;
        page.wait_for_selector(Self::SUCCESS_ALERT, WaitState::Visible)
            .await?;
        page.inner_text(Self::SUCCESS_ALERT).await
    }

    /// Restore the default mail transport; returns the alert text
    pub async fn reset_to_default(page: &Page) -> BrowserResult<String> {
        page.click(Self::USE_PHP_MAIL_RADIO).await?;
        page.click(Self::SAVE_BUTTON).await?;
        page.wait_for_selector(Self::SUCCESS_ALERT, WaitState::Visible)
            .await?;
        page.inner_text(Self::SUCCESS_ALERT).await
    }
}
