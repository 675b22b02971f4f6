//! BO customers: filter-by-name campaign
//!
//! Pre-condition: a created customer account. Main body: the admin grid
//! finds the record when filtered by its last name. Post-condition: the
//! record is deleted, so the next run starts clean.

use shoptest_browser::pages::{BoCustomersPage, BoDashboardPage};
use shoptest_browser::BrowserDriver;
use shoptest_harness::{expect_contains, expect_true, Scenario};

use crate::config::CampaignConfig;
use crate::data::CustomerData;
use crate::fixtures;
use crate::state::{Cx, ShopState};
use crate::PreparedCampaign;

pub fn campaign(driver: &BrowserDriver, cfg: &CampaignConfig) -> PreparedCampaign {
    let customer = CustomerData::random();

    let scenario = Scenario::builder(
        "BO - Customers : Filter customers by name",
        "functional_BO_customers_filterByName",
    )
    .fixture(fixtures::browser_session(driver.clone()))
    .fixture(fixtures::customer_account(cfg.clone(), customer.clone()))
    .step("loginBO", "should login in BO", {
        let cfg = cfg.clone();
        move |cx: &mut Cx| {
            let cfg = cfg.clone();
            Box::pin(async move {
                let page = cx.state.page()?;
                fixtures::ensure_bo_login(&page, &cfg).await?;
                let title = BoDashboardPage::get_page_title(&page).await?;
                expect_contains(&title, BoDashboardPage::PAGE_TITLE)
            })
        }
    })
    .step(
        "goToCustomersPage",
        "should go to 'Customers > Customers' page",
        |cx: &mut Cx| {
            Box::pin(async move {
                let page = cx.state.page()?;
                fixtures::go_to_customers_page(&page).await?;
                let title = BoCustomersPage::get_page_title(&page).await?;
                expect_contains(&title, BoCustomersPage::PAGE_TITLE)
            })
        },
    )
    .step(
        "filterByLastName",
        "should filter the grid by the created customer's last name",
        {
            let lastname = customer.lastname.clone();
            move |cx: &mut Cx| {
                let lastname = lastname.clone();
                Box::pin(async move {
                    let page = cx.state.page()?;
                    BoCustomersPage::filter_by_last_name(&page, &lastname).await?;

                    expect_true(
                        BoCustomersPage::has_results(&page).await?,
                        "filtered grid has results",
                    )?;
                    let shown = BoCustomersPage::get_first_row_last_name(&page).await?;
                    expect_contains(&shown, &lastname)
                })
            }
        },
    )
    .step("resetFilter", "should reset the grid filter", |cx: &mut Cx| {
        Box::pin(async move {
            let page = cx.state.page()?;
            BoCustomersPage::reset_filter(&page).await?;
            Ok(())
        })
    })
    .build();

    (scenario, ShopState::default())
}
