//! FO login: password reminder campaign
//!
//! Pre-conditions: SMTP capture configured, a fresh customer account.
//! Main body: request a reset mail, follow its link, change the password,
//! verify the old password is rejected and the new one accepted.
//! Post-conditions: delete the customer, restore the SMTP configuration.

use regex::Regex;
use shoptest_browser::pages::{FoHomePage, FoLoginPage, FoMyAccountPage, FoPasswordReminderPage};
use shoptest_browser::BrowserDriver;
use shoptest_harness::{expect_contains, expect_true, Scenario, StepError, StepResult};

use crate::config::CampaignConfig;
use crate::data::CustomerData;
use crate::fixtures;
use crate::state::{Cx, ShopState};
use crate::PreparedCampaign;

const RESET_MAIL_SUBJECT: &str = "Password query confirmation";
const NEW_PASSWORD: &str = "new test password";

pub fn campaign(driver: &BrowserDriver, cfg: &CampaignConfig) -> PreparedCampaign {
    let customer = CustomerData::random();
    let renewed = customer.with_password(NEW_PASSWORD);

    let scenario = Scenario::builder(
        "FO - Login : Password reminder",
        "functional_FO_login_passwordReminder",
    )
    .step_timeout(cfg.mail_wait + std::time::Duration::from_secs(15))
    .fixture(fixtures::browser_session(driver.clone()))
    .fixture(fixtures::smtp_config(cfg.clone()))
    .fixture(fixtures::customer_account(cfg.clone(), customer.clone()))
    .fixture(fixtures::mail_listener(cfg.mail.clone()))
    .step("goToShopFO", "should open the shop page", {
        let fo_url = cfg.fo_url.clone();
        move |cx: &mut Cx| {
            let fo_url = fo_url.clone();
            Box::pin(async move {
                let page = cx.state.page()?;
                FoHomePage::goto(&page, &fo_url).await?;
                expect_true(FoHomePage::is_home_page(&page).await?, "home page displayed")
            })
        }
    })
    .step("goToLoginPage", "should go to login page", |cx: &mut Cx| {
        Box::pin(async move {
            let page = cx.state.page()?;
            FoHomePage::go_to_login_page(&page).await?;
            expect_contains(&page.title().await?, FoLoginPage::PAGE_TITLE)
        })
    })
    .step(
        "goToPasswordReminderPage",
        "should click on 'Forgot your password?' link",
        |cx: &mut Cx| {
            Box::pin(async move {
                let page = cx.state.page()?;
                FoLoginPage::go_to_password_reminder_page(&page).await?;
                expect_contains(&page.title().await?, FoPasswordReminderPage::PAGE_TITLE)
            })
        },
    )
    .step(
        "sendResetPasswordLink",
        "should set the email address and send the reset link",
        {
            let email = customer.email.clone();
            move |cx: &mut Cx| {
                let email = email.clone();
                Box::pin(async move {
                    let page = cx.state.page()?;
                    FoPasswordReminderPage::send_reset_link(&page, &email).await?;
                    let alert = FoPasswordReminderPage::get_success_alert(&page).await?;
                    expect_contains(&alert, &email)
                })
            }
        },
    )
    .step(
        "checkResetPasswordMail",
        "should check that the reset mail reached the mailbox",
        {
            let wait = cfg.mail_wait;
            move |cx: &mut Cx| {
                Box::pin(async move {
                    let mail = cx.state.mail_mut()?.wait_for_message(wait).await?;
                    expect_contains(&mail.subject, RESET_MAIL_SUBJECT)?;
                    cx.state.captured_mail = Some(mail);
                    Ok(())
                })
            }
        },
    )
    .step(
        "openResetPasswordLink",
        "should open the reset password link",
        |cx: &mut Cx| {
            Box::pin(async move {
                let mail = cx
                    .state
                    .captured_mail
                    .take()
                    .ok_or_else(|| StepError::Action("no captured mail message".to_string()))?;
                let url = extract_reset_url(&mail.text)?;

                let page = cx.state.page()?;
                page.goto(&url).await?;
                expect_contains(&page.title().await?, FoPasswordReminderPage::PAGE_TITLE)
            })
        },
    )
    .step(
        "checkEmailAddress",
        "should check the email address to reset",
        {
            let email = customer.email.clone();
            move |cx: &mut Cx| {
                let email = email.clone();
                Box::pin(async move {
                    let page = cx.state.page()?;
                    let shown = FoPasswordReminderPage::get_email_to_reset(&page).await?;
                    expect_contains(&shown, &email)
                })
            }
        },
    )
    .step(
        "changePassword",
        "should change the password and check the validation message",
        |cx: &mut Cx| {
            Box::pin(async move {
                let page = cx.state.page()?;
                FoPasswordReminderPage::set_new_password(&page, NEW_PASSWORD).await?;
                let message = FoMyAccountPage::get_success_message(&page).await?;
                expect_contains(&message, FoMyAccountPage::RESET_PASSWORD_SUCCESS_MESSAGE)
            })
        },
    )
    .step("signOutFO", "should logout from FO", |cx: &mut Cx| {
        Box::pin(async move {
            let page = cx.state.page()?;
            FoMyAccountPage::logout(&page).await?;
            let connected = FoMyAccountPage::is_customer_connected(&page).await?;
            expect_true(!connected, "customer disconnected")
        })
    })
    .step(
        "signInWithOldPassword",
        "should try to login with the old password and check the error",
        {
            let customer = customer.clone();
            move |cx: &mut Cx| {
                let customer = customer.clone();
                Box::pin(async move {
                    let page = cx.state.page()?;
                    FoLoginPage::login(&page, &customer.email, &customer.password).await?;
                    let error = FoLoginPage::get_login_error(&page).await?;
                    expect_contains(&error, FoLoginPage::LOGIN_ERROR_TEXT)
                })
            }
        },
    )
    .step(
        "signInWithNewPassword",
        "should sign in with the new password",
        {
            let renewed = renewed.clone();
            move |cx: &mut Cx| {
                let renewed = renewed.clone();
                Box::pin(async move {
                    let page = cx.state.page()?;
                    FoLoginPage::login(&page, &renewed.email, &renewed.password).await?;
                    let connected = FoMyAccountPage::is_customer_connected(&page).await?;
                    expect_true(connected, "customer connected with new password")
                })
            }
        },
    )
    .step("signOutFO2", "should logout from FO", |cx: &mut Cx| {
        Box::pin(async move {
            let page = cx.state.page()?;
            FoMyAccountPage::logout(&page).await?;
            let connected = FoMyAccountPage::is_customer_connected(&page).await?;
            expect_true(!connected, "customer disconnected")
        })
    })
    .build();

    (scenario, ShopState::default())
}

/// First URL in the mail body; reset mails carry exactly one link
fn extract_reset_url(text: &str) -> StepResult<String> {
    let re = Regex::new(r"https?://\S+")
        .map_err(|e| StepError::Action(format!("bad reset-link pattern: {}", e)))?;
    re.find(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',']).to_string())
        .ok_or_else(|| StepError::Action("no reset link found in mail body".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_reset_url() {
        let body = "Please click this link to reset your password: \
                    http://127.0.0.1:8080/password-recovery?token=abc123.";
        let url = extract_reset_url(body).unwrap();
        assert_eq!(url, "http://127.0.0.1:8080/password-recovery?token=abc123");
    }

    #[test]
    fn test_extract_reset_url_missing() {
        let err = extract_reset_url("no link here").unwrap_err();
        assert!(err.to_string().contains("no reset link"));
    }
}
