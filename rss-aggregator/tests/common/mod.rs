#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rss_aggregator::{DigestConfig, DigestDelivery, DigestOutput, FeedRetriever, FetchOutcome, LiveSourceSpec, RawEntry};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn run_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 11, 0, 0).unwrap()
}

pub fn entry(title: &str, summary: &str, age_hours: Option<i64>) -> RawEntry {
    let slug = title.to_lowercase().replace(' ', "-");
    RawEntry {
        title: title.to_string(),
        link: format!("https://news.example.edu/{}", slug),
        summary: Some(summary.to_string()),
        published: age_hours.map(|hours| run_time() - Duration::hours(hours)),
    }
}

/// Serves canned outcomes keyed by feed URL; unknown URLs fail like a dead host.
#[derive(Default)]
pub struct StaticRetriever {
    feeds: HashMap<String, FetchOutcome>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StaticRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, uri: &str, entries: Vec<RawEntry>) -> Self {
        self.feeds.insert(uri.to_string(), FetchOutcome::Fetched(entries));
        self
    }

    pub fn with_failure(mut self, uri: &str, reason: &str) -> Self {
        self.feeds.insert(uri.to_string(), FetchOutcome::failed(reason));
        self
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl FeedRetriever for StaticRetriever {
    async fn retrieve(&self, source: &LiveSourceSpec) -> FetchOutcome {
        self.calls.lock().unwrap().push(source.name.clone());
        self.feeds
            .get(&source.uri)
            .cloned()
            .unwrap_or_else(|| FetchOutcome::failed("connection refused"))
    }
}

/// Keeps every digest it is handed; optionally refuses them all.
#[derive(Default)]
pub struct RecordingDelivery {
    sent: Arc<Mutex<Vec<DigestOutput>>>,
    fail: bool,
}

impl RecordingDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Arc<Mutex<Vec<DigestOutput>>> {
        self.sent.clone()
    }
}

impl DigestDelivery for RecordingDelivery {
    fn deliver(&self, digest: &DigestOutput) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("535 authentication failed");
        }
        self.sent.lock().unwrap().push(digest.clone());
        Ok(())
    }

    fn channel_name(&self) -> String {
        "recording".to_string()
    }
}

pub fn sample_config() -> DigestConfig {
    DigestConfig::from_json(
        r#"{
            "settings": {
                "lookback_hours": 24,
                "max_articles_per_source": 10,
                "max_articles_total": 25,
                "min_relevance_score": 5
            },
            "daily_sources": {
                "Inside Higher Ed": "https://ihe.example.com/rss",
                "Dead Feed": "https://dead.example.com/rss",
                "EDUCAUSE": "https://educause.example.org/rss"
            },
            "weekly_sources": {
                "Policy Weekly": "https://policy.example.org/weekly"
            },
            "relevance_keywords": {
                "_comment": "weights",
                "AI governance": 10,
                "higher education": 8,
                "LLM": 4,
                "Microsoft": 3
            },
            "categories": {
                "Higher Ed Specific": ["higher education", "university"],
                "Policy & Governance": ["governance", "policy"],
                "Enterprise Tech": ["microsoft"],
                "AI/ML Developments": ["llm"]
            }
        }"#,
    )
    .unwrap()
}
