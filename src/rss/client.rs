//! HTTP client creation and request handling for RSS feeds.

use anyhow::Result;
use reqwest::{cookie::Jar, header};
use std::sync::Arc;
use tracing::debug;

use super::types::{FetchError, BROWSER_USER_AGENT, REQUEST_TIMEOUT};
use crate::TARGET_WEB_REQUEST;

/// Create the client shared by the feed fetcher and the notifier
pub fn create_http_client() -> Result<reqwest::Client> {
    let cookie_store = Jar::default();
    debug!(target: TARGET_WEB_REQUEST, "Creating HTTP client");

    reqwest::Client::builder()
        .cookie_store(true)
        .cookie_provider(Arc::new(cookie_store))
        .gzip(true)
        .redirect(reqwest::redirect::Policy::default())
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))
}

/// GET the feed with a browser user agent and return the raw body.
///
/// Any non-success status is an error; redirects are followed by the client.
pub async fn fetch_feed_body(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<u8>, FetchError> {
    debug!(target: TARGET_WEB_REQUEST, "Sending GET request to {}", url);

    let response = client
        .get(url)
        .header(header::USER_AGENT, BROWSER_USER_AGENT)
        .send()
        .await?;

    let status = response.status();
    debug!(target: TARGET_WEB_REQUEST, "Request to {} returned status {}", url, status);
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let bytes = response.bytes().await?;
    Ok(bytes.to_vec())
}
