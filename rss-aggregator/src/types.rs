use chrono::{DateTime, Utc};
// Use the interfaces crate for boundary types
pub use interfaces::defs::{DigestDelivery, DigestOutput, LiveSourceSpec, RawEntry};

use crate::rss_utils::feed::extract_text_from_html;
use crate::utils::text::truncate_chars;

/// Category assigned when no configured category matches.
pub const FALLBACK_CATEGORY: &str = "General";

/// Maximum summary length kept on an article, in characters.
pub const MAX_SUMMARY_CHARS: usize = 500;

/// One feed item after enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub source: String,
    pub published: Option<DateTime<Utc>>,
    pub summary: String,
    pub relevance_score: f64,
    pub matched_keywords: Vec<String>,
    pub category: String,
}

impl Article {
    pub fn new(title: impl Into<String>, link: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            source: source.into(),
            published: None,
            summary: String::new(),
            relevance_score: 0.0,
            matched_keywords: Vec::new(),
            category: FALLBACK_CATEGORY.to_string(),
        }
    }

    pub fn with_published(mut self, published: Option<DateTime<Utc>>) -> Self {
        self.published = published;
        self
    }

    /// Strips markup and caps the summary at [`MAX_SUMMARY_CHARS`].
    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = truncate_chars(&extract_text_from_html(summary), MAX_SUMMARY_CHARS);
        self
    }

    pub fn from_entry(entry: &RawEntry, source: &str) -> Self {
        Self::new(entry.title.clone(), entry.link.clone(), source)
            .with_published(entry.published)
            .with_summary(entry.summary.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; EnterpriseAIAggregator/1.0)".to_string(),
            timeout_seconds: 15,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

/// Result of pulling a single source. A failed source never aborts a run.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched(Vec<RawEntry>),
    Failed { reason: String },
}

impl FetchOutcome {
    pub fn failed(reason: impl ToString) -> Self {
        Self::Failed {
            reason: reason.to_string(),
        }
    }
}

/// Per-run choices that sit on top of the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub include_weekly: bool,
    pub min_relevance_override: Option<f64>,
}

impl RunOptions {
    pub fn daily() -> Self {
        Self::default()
    }

    pub fn weekly() -> Self {
        Self {
            include_weekly: true,
            ..Self::default()
        }
    }

    pub fn with_min_relevance(mut self, min_relevance: Option<f64>) -> Self {
        self.min_relevance_override = min_relevance;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Delivery via {channel} failed: {message}")]
    Delivery { channel: String, message: String },
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
