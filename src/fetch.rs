use std::time::Duration;

use log::debug;

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;

/// Fetch the page body with a single blocking GET.
///
/// Non-2xx responses are errors; there are no retries.
pub fn fetch_page(url: &str, config: &ScrapeConfig) -> Result<String, ScrapeError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .user_agent(&config.user_agent)
        .build()?;

    debug!("Fetching {}", url);
    let response = client.get(url).send()?;
    let body = response.error_for_status()?.text()?;
    Ok(body)
}
