use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use press_relay::config::Config;
use press_relay::logging;
use press_relay::relay;
use press_relay::rss;
use press_relay::telegram::TelegramClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::configure_logging();

    let config = Config::parse();
    info!("Relaying {} to Telegram chat {}", config.feed_url, config.chat_id);

    let client = rss::create_http_client().context("Failed to create HTTP client")?;
    let notifier = TelegramClient::new(client.clone(), &config.bot_token, &config.chat_id);

    let report = relay::run(&client, &config.feed_url, &notifier).await;
    info!(
        "Run finished: {} items, {} sent, {} failed, fallback: {}",
        report.items_found, report.sent, report.failed, report.fell_back
    );

    Ok(())
}
