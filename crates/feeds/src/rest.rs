//! Shared HTTP plumbing for storefront REST endpoints.

use crate::error::FeedError;
use std::time::Duration;
use tracing::debug;

/// User agent sent with every upstream request.
pub const USER_AGENT: &str = concat!("storefront-deals/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by all feeds.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, FeedError> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// GET a URL and return the body, failing on non-success status.
pub async fn fetch_body(client: &reqwest::Client, url: &str) -> Result<String, FeedError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        debug!(url = url, status = %status, "Upstream returned non-success status");
        return Err(FeedError::HttpStatus(status.as_u16()));
    }

    let body = response.text().await?;
    debug!(url = url, bytes = body.len(), "Fetched upstream body");
    Ok(body)
}
