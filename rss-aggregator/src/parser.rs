use crate::types::{AggregatorError, RawEntry, Result};
use chrono::Utc;
use feed_rs::parser;
use tracing::{debug, info};

/// Turns feed documents (RSS, Atom, JSON Feed) into [`RawEntry`] records.
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_feed(&self, content: &str) -> Result<Vec<RawEntry>> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| AggregatorError::Parse(format!("Failed to parse feed: {}", e)))?;

        let total = feed.entries.len();
        let entries: Vec<RawEntry> = feed.entries.into_iter().filter_map(Self::parse_entry).collect();

        info!("Parsed feed with {} entries ({} skipped)", entries.len(), total - entries.len());
        Ok(entries)
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> Option<RawEntry> {
        let title = entry.title.map(|t| t.content).unwrap_or_else(|| "Untitled".to_string());

        let link = match entry.links.first() {
            Some(link) => link.href.clone(),
            None => {
                debug!("Skipping entry without a link: {}", title);
                return None;
            }
        };

        // Prefer the summary/description; fall back to the full content body.
        let summary = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body));

        let published = entry.published.or(entry.updated).map(|dt| dt.with_timezone(&Utc));

        Some(RawEntry {
            title,
            link,
            summary,
            published,
        })
    }
}

impl Default for FeedParser {
    fn default() -> Self {
        Self::new()
    }
}
