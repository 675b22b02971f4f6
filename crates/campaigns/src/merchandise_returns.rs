//! BO customer service: merchandise returns toggle campaign
//!
//! Pre-condition: returns enabled. Main body: the configuration page shows
//! the feature as enabled. Post-condition: the flag is restored.

use shoptest_browser::pages::BoMerchandiseReturnsPage;
use shoptest_browser::BrowserDriver;
use shoptest_harness::{expect_contains, expect_true, Scenario};

use crate::config::CampaignConfig;
use crate::fixtures;
use crate::state::{Cx, ShopState};
use crate::PreparedCampaign;

pub fn campaign(driver: &BrowserDriver, cfg: &CampaignConfig) -> PreparedCampaign {
    let scenario = Scenario::builder(
        "BO - Customer Service : Merchandise returns status",
        "functional_BO_customerService_merchandiseReturnsStatus",
    )
    .fixture(fixtures::browser_session(driver.clone()))
    .fixture(fixtures::merchandise_returns(cfg.clone(), true))
    .step(
        "goToMerchandiseReturnsPage",
        "should go to 'Customer Service > Merchandise Returns' page",
        {
            let cfg = cfg.clone();
            move |cx: &mut Cx| {
                let cfg = cfg.clone();
                Box::pin(async move {
                    let page = cx.state.page()?;
                    fixtures::ensure_bo_login(&page, &cfg).await?;
                    fixtures::go_to_merchandise_returns_page(&page).await?;
                    let title = BoMerchandiseReturnsPage::get_page_title(&page).await?;
                    expect_contains(&title, BoMerchandiseReturnsPage::PAGE_TITLE)
                })
            }
        },
    )
    .step(
        "checkReturnsEnabled",
        "should see merchandise returns enabled",
        |cx: &mut Cx| {
            Box::pin(async move {
                let page = cx.state.page()?;
                let enabled = BoMerchandiseReturnsPage::is_returns_enabled(&page).await?;
                expect_true(enabled, "merchandise returns enabled")
            })
        },
    )
    .build();

    (scenario, ShopState::default())
}
