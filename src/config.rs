use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use std::fmt;

pub const DEFAULT_FEED_URL: &str = "https://www.state.gov/rss-feed/press-releases/feed/";

/// Relay the latest press releases from an RSS feed to a Telegram chat.
#[derive(Parser, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// RSS feed to read
    #[arg(long, env = "FEED_URL", default_value = DEFAULT_FEED_URL, value_parser = parse_feed_url)]
    pub feed_url: String,

    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true, value_parser = NonEmptyStringValueParser::new())]
    pub bot_token: String,

    /// Telegram chat id messages are sent to
    #[arg(long, env = "TELEGRAM_CHAT_ID", value_parser = NonEmptyStringValueParser::new())]
    pub chat_id: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("feed_url", &self.feed_url)
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Helper function to validate a URL
pub fn is_valid_url(url: &str) -> bool {
    if let Ok(parsed) = url::Url::parse(url) {
        parsed.scheme() == "http" || parsed.scheme() == "https"
    } else {
        false
    }
}

fn parse_feed_url(value: &str) -> Result<String, String> {
    let value = value.trim();
    if is_valid_url(value) {
        Ok(value.to_string())
    } else {
        Err(format!("'{}' is not an http(s) URL", value))
    }
}
