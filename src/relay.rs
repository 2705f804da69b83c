//! One relay run: fetch the feed once, then post each item to the chat.

use tracing::{info, warn};

use crate::rss::{fetch_latest_items, FeedItem, MAX_ITEMS};
use crate::telegram::TelegramClient;

pub const FAILURE_MESSAGE: &str =
    "Failed to retrieve the latest press releases from the U.S. State Department.";

/// What happened during a run. The process exits normally whatever it says.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RelayReport {
    pub items_found: usize,
    pub sent: usize,
    pub failed: usize,
    pub fell_back: bool,
}

/// Escape the characters Telegram's HTML parse mode treats as markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Message for the `index`-th (1-based) item.
pub fn format_item_message(index: usize, item: &FeedItem) -> String {
    format!(
        "<b>Item {}:</b>\n<b>Title:</b> {}\n<b>URL:</b> {}\n",
        index,
        escape_html(&item.title),
        escape_html(&item.url)
    )
}

pub async fn run(
    client: &reqwest::Client,
    feed_url: &str,
    notifier: &TelegramClient,
) -> RelayReport {
    let mut report = RelayReport::default();

    let items = match fetch_latest_items(client, feed_url, MAX_ITEMS).await {
        Ok(items) if items.is_empty() => {
            warn!("Feed contained no usable items");
            items
        }
        Ok(items) => items,
        Err(err) => {
            warn!("Feed fetch failed: {}", err);
            Vec::new()
        }
    };
    report.items_found = items.len();

    if items.is_empty() {
        info!("No items found or failed to retrieve the page.");
        report.fell_back = true;
        record(&mut report, notifier.send_message(FAILURE_MESSAGE).await.is_ok());
        return report;
    }

    for (i, item) in items.iter().enumerate() {
        let index = i + 1;
        info!("Item {}:", index);
        info!("Title: {}", item.title);
        info!("URL: {}", item.url);

        let message = format_item_message(index, item);
        record(&mut report, notifier.send_message(&message).await.is_ok());
    }

    report
}

fn record(report: &mut RelayReport, delivered: bool) {
    if delivered {
        report.sent += 1;
    } else {
        report.failed += 1;
    }
}
