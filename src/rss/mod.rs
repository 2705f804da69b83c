//! RSS feed module for press-relay.
//!
//! This module handles fetching a feed and reducing it to a short list of items.

mod client;
mod fetcher;
mod parser;
mod types;

pub use self::types::*;

pub use self::client::{create_http_client, fetch_feed_body};
pub use self::fetcher::fetch_latest_items;
pub use self::parser::parse_feed_items;
