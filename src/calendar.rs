use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

pub const CALENDAR_URL: &str = "https://www.federalreserve.gov/monetarypolicy/fomccalendars.htm";

/// HTTP client shared by the calendar fetch and the document downloads.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("fomc_collector/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}

/// Fetch the FOMC calendar page. Any network error or non-2xx status is fatal.
pub async fn fetch_calendar(client: &reqwest::Client, url: &str) -> Result<String> {
    info!("Fetching FOMC calendar: {}", url);
    let html = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .context("Failed to download FOMC calendar page")?
        .text()
        .await
        .context("Failed to read FOMC calendar page")?;

    info!("Calendar page: {} bytes", html.len());
    Ok(html)
}
