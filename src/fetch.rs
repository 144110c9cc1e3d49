use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

pub const SOURCE_URL: &str = "https://www.progressivedatajobs.org/job-postings/";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetch the job-postings page and return its HTML.
pub async fn fetch_listing_page() -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to create HTTP client")?;

    info!("Fetching job postings: {}", SOURCE_URL);
    let response = client
        .get(SOURCE_URL)
        .send()
        .await
        .context("Failed to fetch job postings page")?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("HTTP {} for {}", status, SOURCE_URL);
    }

    let html = response
        .text()
        .await
        .context("Failed to read job postings page")?;
    info!("Fetched {} bytes", html.len());
    Ok(html)
}
