//! Main RSS fetching functionality: one GET, one parse, no retries.

use tracing::{error, info};

use super::client::fetch_feed_body;
use super::parser::parse_feed_items;
use super::types::{FeedItem, FetchError};
use crate::TARGET_WEB_REQUEST;

/// Fetch `url` and return up to `max_items` of its items in document order.
///
/// Failures are logged here and returned tagged; nothing is retried.
pub async fn fetch_latest_items(
    client: &reqwest::Client,
    url: &str,
    max_items: usize,
) -> Result<Vec<FeedItem>, FetchError> {
    let body = match fetch_feed_body(client, url).await {
        Ok(body) => {
            info!(target: TARGET_WEB_REQUEST, "Successfully retrieved the page from {}", url);
            body
        }
        Err(err) => {
            error!(target: TARGET_WEB_REQUEST, "Failed to retrieve the page. Error: {}", err);
            return Err(err);
        }
    };

    parse_feed_items(&body, max_items).map_err(|err| {
        error!(target: TARGET_WEB_REQUEST, "Failed to parse XML content. Error: {}", err);
        err
    })
}
