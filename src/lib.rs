pub mod config;
pub mod logging;
pub mod relay;
pub mod rss;
pub mod telegram;

#[cfg(test)]
mod test_support;

pub const TARGET_WEB_REQUEST: &str = "web_request";
