/// RSS-specific utility functions for the aggregator

/// URL utilities for RSS feeds
pub mod url {
    use url::Url;

    /// Extract domain from URL
    pub fn extract_domain(url_str: &str) -> Option<String> {
        Url::parse(url_str).ok()?.domain().map(|d| d.to_string())
    }

    /// Validate RSS feed URL format
    pub fn is_valid_rss_url(url_str: &str) -> bool {
        match Url::parse(url_str) {
            Ok(url) => url.scheme() == "http" || url.scheme() == "https",
            Err(_) => false,
        }
    }
}

/// Lookback window utilities
pub mod time {
    use chrono::{DateTime, Duration, Utc};

    /// Weekly sources always look back a full week.
    pub const WEEKLY_LOOKBACK_HOURS: i64 = 168;

    /// Windows reaching past the representable range start at the earliest instant.
    pub fn lookback_cutoff(now: DateTime<Utc>, lookback_hours: i64) -> DateTime<Utc> {
        Duration::try_hours(lookback_hours)
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Undated entries count as recent.
    pub fn is_within_lookback(published: Option<DateTime<Utc>>, cutoff: DateTime<Utc>) -> bool {
        match published {
            Some(published) => published >= cutoff,
            None => true,
        }
    }
}

/// RSS feed parsing utilities
pub mod feed {
    /// Remove `<...>` tags, leaving all other text (whitespace included) as is.
    /// A tag runs from `<` to the next `>` and must be non-empty. A lone `<`
    /// with no later `>`, or a bare `<>`, is kept literally.
    pub fn extract_text_from_html(html: &str) -> String {
        let mut text = String::with_capacity(html.len());
        let mut rest = html;
        while let Some(start) = rest.find('<') {
            text.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            match after.find('>') {
                Some(end) if end > 0 => rest = &after[end + 1..],
                _ => {
                    text.push('<');
                    rest = after;
                }
            }
        }
        text.push_str(rest);
        text
    }
}
