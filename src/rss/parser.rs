//! Feed parsing logic: RSS document to a bounded list of items.

use feed_rs::model::{Entry, FeedType};
use feed_rs::parser;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::{debug, info};

use super::types::{FeedItem, FetchError};
use crate::TARGET_WEB_REQUEST;

/// Parse an RSS document and return at most `max_items` items in document order.
///
/// The cap applies to the `channel/item` nodes themselves, so an item skipped for
/// a missing title or link still uses up one of the `max_items` slots.
pub fn parse_feed_items(
    body: &[u8],
    max_items: usize,
) -> Result<Vec<FeedItem>, FetchError> {
    let body = body.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(body);
    check_well_formed(body)?;
    let feed = parser::parse(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    match feed.feed_type {
        FeedType::RSS0 | FeedType::RSS1 | FeedType::RSS2 => {}
        other => {
            return Err(FetchError::Parse(format!(
                "expected an RSS document, found {:?}",
                other
            )))
        }
    }
    info!(target: TARGET_WEB_REQUEST, "Successfully parsed the XML content");
    info!(target: TARGET_WEB_REQUEST, "Number of items found: {}", feed.entries.len());

    Ok(feed
        .entries
        .into_iter()
        .take(max_items)
        .filter_map(item_from_entry)
        .collect())
}

/// Walk the whole document once and require exactly one root element that closes.
///
/// feed-rs alone accepts a body that ends before its closing root tag.
fn check_well_formed(body: &[u8]) -> Result<(), FetchError> {
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut root_closed = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => {
                if depth == 0 && root_closed {
                    return Err(FetchError::Parse("junk after document element".into()));
                }
                depth += 1;
            }
            Ok(Event::End(_)) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| FetchError::Parse("unmatched closing tag".into()))?;
                if depth == 0 {
                    root_closed = true;
                }
            }
            Ok(Event::Empty(_)) if depth == 0 => {
                if root_closed {
                    return Err(FetchError::Parse("junk after document element".into()));
                }
                root_closed = true;
            }
            Ok(Event::Text(_)) | Ok(Event::CData(_)) if depth == 0 => {
                return Err(FetchError::Parse("text outside the document element".into()));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FetchError::Parse(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    if depth > 0 {
        return Err(FetchError::Parse(format!(
            "document ended with {} unclosed element(s)",
            depth
        )));
    }
    if !root_closed {
        return Err(FetchError::Parse("no document element found".into()));
    }
    Ok(())
}

fn item_from_entry(entry: Entry) -> Option<FeedItem> {
    let title = entry
        .title
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty());
    let url = entry
        .links
        .into_iter()
        .next()
        .map(|link| link.href.trim().to_string())
        .filter(|u| !u.is_empty());

    match (title, url) {
        (Some(title), Some(url)) => Some(FeedItem { title, url }),
        (title, url) => {
            debug!(target: TARGET_WEB_REQUEST, "Skipping item without title or link (title: {:?}, link: {:?})", title, url);
            None
        }
    }
}
