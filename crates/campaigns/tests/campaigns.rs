//! Campaign runner entry point
//!
//! Runs the composed campaigns against a live storefront deployment.
//! Run with: cargo test --package shoptest-campaigns --test campaigns

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use shoptest_browser::{BrowserConfig, BrowserDriver, BrowserKind};
use shoptest_campaigns::CampaignConfig;
use shoptest_harness::CampaignReport;
use shoptest_mail::MailConfig;

#[derive(Parser, Debug)]
#[command(name = "shoptest-campaigns")]
#[command(about = "Functional campaign runner for storefront deployments")]
struct Args {
    /// Run only the campaign with this name (e.g. password-reminder)
    #[arg(short, long)]
    campaign: Option<String>,

    /// Storefront base URL
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    fo_url: String,

    /// Administration base URL
    #[arg(long, default_value = "http://127.0.0.1:8080/admin-dev")]
    bo_url: String,

    /// Administration login
    #[arg(long, default_value = "admin@shop.test")]
    bo_email: String,

    /// Administration password
    #[arg(long, default_value = "admin-password")]
    bo_password: String,

    /// Web API of the mail-capture service
    #[arg(long, default_value = "http://127.0.0.1:1080")]
    mail_api: String,

    /// SMTP host of the mail-capture service, as seen by the platform
    #[arg(long, default_value = "127.0.0.1")]
    smtp_server: String,

    /// SMTP port of the mail-capture service
    #[arg(long, default_value = "1025")]
    smtp_port: u16,

    /// Seconds to wait for a captured mail message
    #[arg(long, default_value = "15")]
    mail_wait: u64,

    /// Browser to use (chromium, firefox, webkit)
    #[arg(long, default_value = "chromium")]
    browser: String,

    /// Show the browser window instead of running headless
    #[arg(long)]
    headful: bool,

    /// Output directory for the JSON report
    #[arg(short, long, default_value = "test-results")]
    output: PathBuf,
}

fn main() {
    // Needs a deployed storefront, a mail-capture service and Playwright.
    if std::env::var_os("SHOPTEST_E2E").is_none() {
        eprintln!("Skipping campaigns: set SHOPTEST_E2E=1 and point the runner at a live deployment");
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {}", e);
            std::process::exit(2);
        }
    };

    match rt.block_on(async_main(args)) {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

async fn async_main(args: Args) -> Result<bool, Box<dyn Error>> {
    let browser = match args.browser.as_str() {
        "firefox" => BrowserKind::Firefox,
        "webkit" => BrowserKind::Webkit,
        _ => BrowserKind::Chromium,
    };

    let cfg = CampaignConfig {
        fo_url: args.fo_url,
        bo_url: args.bo_url,
        bo_email: args.bo_email,
        bo_password: args.bo_password,
        smtp_server: args.smtp_server,
        smtp_port: args.smtp_port,
        mail: MailConfig {
            base_url: args.mail_api,
            ..MailConfig::default()
        },
        mail_wait: Duration::from_secs(args.mail_wait),
        output_dir: args.output,
    };

    let driver = BrowserDriver::launch(BrowserConfig {
        browser,
        headless: !args.headful,
        ..BrowserConfig::default()
    })
    .await?;

    let mut selected = shoptest_campaigns::all(&driver, &cfg);
    if let Some(name) = &args.campaign {
        selected.retain(|(key, _)| key == name);
        if selected.is_empty() {
            driver.shutdown().await?;
            return Err(format!("Campaign not found: {}", name).into());
        }
    }

    let mut reports = Vec::new();
    for (key, (scenario, state)) in selected {
        tracing::info!("Running campaign: {}", key);
        let (report, _state) = scenario.run(state).await;
        reports.push(report);
    }

    driver.shutdown().await?;

    let campaign = CampaignReport::from_scenarios(reports);
    campaign.write_json(&cfg.output_dir)?;

    tracing::info!(
        "Campaign results: {} passed, {} failed ({} ms)",
        campaign.passed,
        campaign.failed,
        campaign.duration_ms
    );

    Ok(campaign.all_passed())
}
