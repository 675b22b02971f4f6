//! Reusable pre/post-condition fixtures
//!
//! Every fixture that creates a record or toggles a configuration flag
//! carries the symmetric teardown; teardowns tolerate partially-applied
//! setup because the harness runs them even after a failure.

use shoptest_browser::pages::{
    BoCustomersPage, BoDashboardPage, BoLoginPage, BoMailSettingsPage, BoMerchandiseReturnsPage,
    FoHomePage, FoLoginPage, FoMyAccountPage, FoRegisterPage,
};
use shoptest_browser::{BrowserDriver, BrowserSession, Page};
use shoptest_harness::{expect_contains, expect_true, Fixture, StepResult};
use shoptest_mail::{MailConfig, MailListener};

use crate::config::CampaignConfig;
use crate::data::CustomerData;
use crate::state::{Cx, ShopState};

/// Open a browsing context and tab for the scenario; release it in
/// teardown. Attach this fixture first so its teardown runs last, after
/// every fixture that still needs the browser.
pub fn browser_session(driver: BrowserDriver) -> Fixture<ShopState> {
    Fixture::new(
        "browser session",
        "openBrowserContext",
        "should open a browsing context",
        move |cx: &mut Cx| {
            let driver = driver.clone();
            Box::pin(async move {
                let session = BrowserSession::acquire(&driver).await?;
                cx.state.session = Some(session);
                Ok(())
            })
        },
    )
    .with_teardown(
        "closeBrowserContext",
        "should close the browsing context",
        |cx: &mut Cx| {
            Box::pin(async move {
                if let Some(session) = cx.state.session.as_mut() {
                    session.close().await?;
                }
                Ok(())
            })
        },
    )
}

/// Start capturing mail before the action that sends it; stop in teardown
pub fn mail_listener(config: MailConfig) -> Fixture<ShopState> {
    Fixture::new(
        "mail listener",
        "startMailListener",
        "should start the mail listener",
        move |cx: &mut Cx| {
            let config = config.clone();
            Box::pin(async move {
                cx.state.mail = Some(MailListener::start(config)?);
                Ok(())
            })
        },
    )
    .with_teardown(
        "stopMailListener",
        "should stop the mail listener",
        |cx: &mut Cx| {
            Box::pin(async move {
                if let Some(listener) = cx.state.mail.as_mut() {
                    listener.stop();
                }
                Ok(())
            })
        },
    )
}

/// Point the platform's outgoing mail at the capture SMTP; restore the
/// default transport in teardown
pub fn smtp_config(cfg: CampaignConfig) -> Fixture<ShopState> {
    let setup_cfg = cfg.clone();
    Fixture::new(
        "smtp config",
        "setupSmtpConfig",
        "should configure SMTP towards the mail capture service",
        move |cx: &mut Cx| {
            let cfg = setup_cfg.clone();
            Box::pin(async move {
                let page = cx.state.page()?;
                ensure_bo_login(&page, &cfg).await?;
                BoDashboardPage::go_to_sub_menu(
                    &page,
                    BoDashboardPage::ADVANCED_PARAMS_PARENT_LINK,
                    BoDashboardPage::EMAIL_LINK,
                )
                .await?;

                let alert =
                    BoMailSettingsPage::setup_smtp(&page, &cfg.smtp_server, cfg.smtp_port).await?;
                expect_contains(&alert, BoMailSettingsPage::SUCCESSFUL_UPDATE_MESSAGE)
            })
        },
    )
    .with_teardown(
        "resetSmtpConfig",
        "should reset the SMTP configuration",
        move |cx: &mut Cx| {
            let cfg = cfg.clone();
            Box::pin(async move {
                let page = cx.state.page()?;
                ensure_bo_login(&page, &cfg).await?;
                BoDashboardPage::go_to_sub_menu(
                    &page,
                    BoDashboardPage::ADVANCED_PARAMS_PARENT_LINK,
                    BoDashboardPage::EMAIL_LINK,
                )
                .await?;

                let alert = BoMailSettingsPage::reset_to_default(&page).await?;
                expect_contains(&alert, BoMailSettingsPage::SUCCESSFUL_UPDATE_MESSAGE)
            })
        },
    )
}

/// Create a customer account on the storefront; delete it from the admin
/// customers grid in teardown
pub fn customer_account(cfg: CampaignConfig, customer: CustomerData) -> Fixture<ShopState> {
    let setup_cfg = cfg.clone();
    let setup_customer = customer.clone();
    Fixture::new(
        "customer account",
        "createCustomerAccount",
        "should create a customer account on FO",
        move |cx: &mut Cx| {
            let cfg = setup_cfg.clone();
            let customer = setup_customer.clone();
            Box::pin(async move {
                let page = cx.state.page()?;
                FoHomePage::goto(&page, &cfg.fo_url).await?;
                FoHomePage::go_to_login_page(&page).await?;
                FoLoginPage::go_to_register_page(&page).await?;
                FoRegisterPage::create_account(
                    &page,
                    &customer.firstname,
                    &customer.lastname,
                    &customer.email,
                    &customer.password,
                )
                .await?;

                let connected = FoMyAccountPage::is_customer_connected(&page).await?;
                expect_true(connected, "customer connected after account creation")?;

                // Leave the storefront signed out for the main body.
                FoMyAccountPage::logout(&page).await?;
                Ok(())
            })
        },
    )
    .with_teardown(
        "deleteCustomerAccount",
        "should delete the customer account from BO",
        move |cx: &mut Cx| {
            let cfg = cfg.clone();
            let customer = customer.clone();
            Box::pin(async move {
                let page = cx.state.page()?;
                ensure_bo_login(&page, &cfg).await?;
                go_to_customers_page(&page).await?;

                BoCustomersPage::filter_by_last_name(&page, &customer.lastname).await?;
                if BoCustomersPage::is_grid_empty(&page).await? {
                    // Setup never got as far as creating the record.
                    return Ok(());
                }

                let alert = BoCustomersPage::delete_first_row(&page).await?;
                expect_contains(&alert, "Successful deletion")
            })
        },
    )
}

/// Enable (or disable) merchandise returns; restore the opposite state in
/// teardown
pub fn merchandise_returns(cfg: CampaignConfig, enabled: bool) -> Fixture<ShopState> {
    let setup_cfg = cfg.clone();
    Fixture::new(
        "merchandise returns",
        "enableMerchandiseReturns",
        "should set the merchandise returns status",
        move |cx: &mut Cx| {
            let cfg = setup_cfg.clone();
            Box::pin(async move {
                let page = cx.state.page()?;
                ensure_bo_login(&page, &cfg).await?;
                go_to_merchandise_returns_page(&page).await?;

                let alert = BoMerchandiseReturnsPage::set_returns_enabled(&page, enabled).await?;
                expect_contains(&alert, BoMerchandiseReturnsPage::SUCCESSFUL_UPDATE_MESSAGE)
            })
        },
    )
    .with_teardown(
        "disableMerchandiseReturns",
        "should restore the merchandise returns status",
        move |cx: &mut Cx| {
            let cfg = cfg.clone();
            Box::pin(async move {
                let page = cx.state.page()?;
                ensure_bo_login(&page, &cfg).await?;
                go_to_merchandise_returns_page(&page).await?;

                let alert = BoMerchandiseReturnsPage::set_returns_enabled(&page, !enabled).await?;
                expect_contains(&alert, BoMerchandiseReturnsPage::SUCCESSFUL_UPDATE_MESSAGE)
            })
        },
    )
}

/// Land on the BO dashboard, logging in first when the session is not
/// authenticated yet
pub async fn ensure_bo_login(page: &Page, cfg: &CampaignConfig) -> StepResult<()> {
    page.goto(&cfg.bo_url).await?;
    if page.is_visible("#email").await? {
        BoLoginPage::login(page, &cfg.bo_email, &cfg.bo_password).await?;
    }
    Ok(())
}

pub(crate) async fn go_to_customers_page(page: &Page) -> StepResult<()> {
    BoDashboardPage::go_to_sub_menu(
        page,
        BoDashboardPage::CUSTOMERS_PARENT_LINK,
        BoDashboardPage::CUSTOMERS_LINK,
    )
    .await?;
    Ok(())
}

pub(crate) async fn go_to_merchandise_returns_page(page: &Page) -> StepResult<()> {
    BoDashboardPage::go_to_sub_menu(
        page,
        BoDashboardPage::CUSTOMER_SERVICE_PARENT_LINK,
        BoDashboardPage::MERCHANDISE_RETURNS_LINK,
    )
    .await?;
    Ok(())
}
