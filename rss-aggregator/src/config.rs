use crate::rss_utils::url::is_valid_rss_url;
use crate::types::{AggregatorError, LiveSourceSpec, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

/// Key in `relevance_keywords` that documents the section rather than weighting anything.
const COMMENT_KEY: &str = "_comment";

pub const DEFAULT_LOOKBACK_HOURS: i64 = 24;
pub const DEFAULT_MAX_ARTICLES_PER_SOURCE: usize = 10;
pub const DEFAULT_MAX_ARTICLES_TOTAL: usize = 25;
pub const DEFAULT_MIN_RELEVANCE_SCORE: f64 = 5.0;

/// Keyword to weight, in document order.
pub type KeywordWeights = IndexMap<String, f64>;

/// Category label to lowercase keyword fragments, in document order.
pub type CategoryFragments = IndexMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub lookback_hours: i64,
    pub max_articles_per_source: usize,
    pub max_articles_total: usize,
    pub min_relevance_score: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lookback_hours: DEFAULT_LOOKBACK_HOURS,
            max_articles_per_source: DEFAULT_MAX_ARTICLES_PER_SOURCE,
            max_articles_total: DEFAULT_MAX_ARTICLES_TOTAL,
            min_relevance_score: DEFAULT_MIN_RELEVANCE_SCORE,
        }
    }
}

impl Settings {
    /// A run-time override always wins over the configured threshold.
    pub fn effective_min_score(&self, override_score: Option<f64>) -> f64 {
        override_score.unwrap_or(self.min_relevance_score)
    }
}

/// Everything a digest run needs, loaded once and passed down by reference.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub settings: Settings,
    pub daily_sources: IndexMap<String, String>,
    pub weekly_sources: IndexMap<String, String>,
    #[serde(deserialize_with = "deserialize_keywords")]
    pub relevance_keywords: KeywordWeights,
    pub categories: CategoryFragments,
}

impl DigestConfig {
    pub fn from_json(content: &str) -> Result<Self> {
        let config: DigestConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;

        info!(
            "Loaded config from {}: {} daily sources, {} weekly sources, {} keywords, {} categories",
            path.display(),
            config.daily_sources.len(),
            config.weekly_sources.len(),
            config.relevance_keywords.len(),
            config.categories.len()
        );
        Ok(config)
    }

    /// Falls back to an empty configuration so a run still completes (and matches nothing).
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn daily_specs(&self) -> Vec<LiveSourceSpec> {
        to_specs(&self.daily_sources)
    }

    pub fn weekly_specs(&self) -> Vec<LiveSourceSpec> {
        to_specs(&self.weekly_sources)
    }

    fn validate(&self) -> Result<()> {
        if self.settings.lookback_hours < 0 {
            return Err(AggregatorError::Config(format!(
                "lookback_hours must not be negative, got {}",
                self.settings.lookback_hours
            )));
        }

        for (name, url) in self.daily_sources.iter().chain(self.weekly_sources.iter()) {
            if !is_valid_rss_url(url) {
                // Still attempted; the fetch will fail and be skipped for this run.
                warn!("Source {} has a non-HTTP feed URL: {}", name, url);
            }
        }

        Ok(())
    }
}

fn to_specs(sources: &IndexMap<String, String>) -> Vec<LiveSourceSpec> {
    sources
        .iter()
        .map(|(name, url)| LiveSourceSpec::new(name.clone(), url.clone()))
        .collect()
}

fn deserialize_keywords<'de, D>(deserializer: D) -> std::result::Result<KeywordWeights, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: IndexMap<String, serde_json::Value> = IndexMap::deserialize(deserializer)?;
    let mut keywords = KeywordWeights::with_capacity(raw.len());

    for (keyword, value) in raw {
        if keyword == COMMENT_KEY {
            continue;
        }
        let weight = value.as_f64().ok_or_else(|| {
            <D::Error as serde::de::Error>::custom(format!("weight for keyword {:?} is not a number: {}", keyword, value))
        })?;
        keywords.insert(keyword, weight);
    }

    Ok(keywords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "settings": {
            "lookback_hours": 36,
            "max_articles_per_source": 5,
            "max_articles_total": 12,
            "min_relevance_score": 7
        },
        "daily_sources": {
            "Inside Higher Ed": "https://www.insidehighered.com/rss.xml",
            "EDUCAUSE Review": "https://er.educause.edu/rss"
        },
        "weekly_sources": {
            "MIT Tech Review": "https://www.technologyreview.com/feed/"
        },
        "relevance_keywords": {
            "_comment": "Higher weight means more relevant",
            "higher education": 8,
            "AI governance": 10,
            "LLM": 4.5
        },
        "categories": {
            "Higher Ed Specific": ["university", "higher education", "campus"],
            "Policy & Governance": ["governance", "policy", "regulation"]
        }
    }"#;

    #[test]
    fn parses_all_sections_in_document_order() {
        let config = DigestConfig::from_json(SAMPLE).unwrap();

        assert_eq!(config.settings.lookback_hours, 36);
        assert_eq!(config.settings.max_articles_per_source, 5);
        assert_eq!(config.settings.max_articles_total, 12);
        assert_eq!(config.settings.min_relevance_score, 7.0);

        let daily: Vec<&str> = config.daily_sources.keys().map(String::as_str).collect();
        assert_eq!(daily, vec!["Inside Higher Ed", "EDUCAUSE Review"]);

        let keywords: Vec<(&str, f64)> = config
            .relevance_keywords
            .iter()
            .map(|(k, w)| (k.as_str(), *w))
            .collect();
        assert_eq!(keywords, vec![("higher education", 8.0), ("AI governance", 10.0), ("LLM", 4.5)]);

        let categories: Vec<&str> = config.categories.keys().map(String::as_str).collect();
        assert_eq!(categories, vec!["Higher Ed Specific", "Policy & Governance"]);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = DigestConfig::from_json(r#"{"settings": {"lookback_hours": 48}}"#).unwrap();

        assert_eq!(config.settings.lookback_hours, 48);
        assert_eq!(config.settings.max_articles_per_source, DEFAULT_MAX_ARTICLES_PER_SOURCE);
        assert_eq!(config.settings.max_articles_total, DEFAULT_MAX_ARTICLES_TOTAL);
        assert_eq!(config.settings.min_relevance_score, DEFAULT_MIN_RELEVANCE_SCORE);
        assert!(config.daily_sources.is_empty());
        assert!(config.relevance_keywords.is_empty());
    }

    #[test]
    fn non_numeric_weight_is_rejected() {
        let result = DigestConfig::from_json(r#"{"relevance_keywords": {"AI": "high"}}"#);
        assert!(matches!(result, Err(AggregatorError::Serialization(_))));
    }

    #[test]
    fn negative_lookback_is_rejected() {
        let result = DigestConfig::from_json(r#"{"settings": {"lookback_hours": -1}}"#);
        assert!(matches!(result, Err(AggregatorError::Config(_))));
    }

    #[test]
    fn override_takes_precedence_over_configured_minimum() {
        let settings = Settings::default();
        assert_eq!(settings.effective_min_score(None), 5.0);
        assert_eq!(settings.effective_min_score(Some(0.0)), 0.0);
        assert_eq!(settings.effective_min_score(Some(12.0)), 12.0);
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = DigestConfig::load(file.path()).unwrap();
        assert_eq!(config.weekly_specs(), vec![LiveSourceSpec::new(
            "MIT Tech Review",
            "https://www.technologyreview.com/feed/"
        )]);
    }

    #[test]
    fn unreadable_or_broken_config_degrades_to_empty() {
        let missing = DigestConfig::load_or_default("/nonexistent/config.json");
        assert_eq!(missing, DigestConfig::default());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert_eq!(DigestConfig::load_or_default(file.path()), DigestConfig::default());
    }
}
