use crate::parser::FeedParser;
use crate::rss_utils::url::extract_domain;
use crate::traits::FeedRetriever;
use crate::types::{AggregatorError, FetchConfig, FetchOutcome, LiveSourceSpec, RawEntry, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    /// One GET, no retry. A source that fails here is simply skipped until the next run.
    pub async fn fetch_feed(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        let url = Url::parse(url)?;

        debug!("Fetching feed: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(AggregatorError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(content_length) = response.content_length() {
            let size_mb = content_length as usize / (1024 * 1024);
            if size_mb > self.config.max_feed_size_mb {
                return Err(AggregatorError::FeedTooLarge { size_mb });
            }
        }

        let content = response.text().await?;
        debug!(
            "Fetched {} ({} bytes in {}ms)",
            url,
            content.len(),
            start_time.elapsed().as_millis()
        );
        Ok(content)
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

/// Feed retrieval over HTTP: [`Fetcher`] for the bytes, [`FeedParser`] for the entries.
pub struct HttpFeedRetriever {
    fetcher: Fetcher,
    parser: FeedParser,
}

impl HttpFeedRetriever {
    pub fn new(config: FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(config)?,
            parser: FeedParser::new(),
        })
    }

    async fn fetch_and_parse(&self, url: &str) -> Result<Vec<RawEntry>> {
        let content = self.fetcher.fetch_feed(url).await?;
        self.parser.parse_feed(&content)
    }
}

#[async_trait]
impl FeedRetriever for HttpFeedRetriever {
    async fn retrieve(&self, source: &LiveSourceSpec) -> FetchOutcome {
        match self.fetch_and_parse(&source.uri).await {
            Ok(entries) => {
                info!(
                    "Retrieved {} entries from {} ({})",
                    entries.len(),
                    source.name,
                    extract_domain(&source.uri).unwrap_or_else(|| source.uri.clone())
                );
                FetchOutcome::Fetched(entries)
            }
            Err(e) => FetchOutcome::failed(e),
        }
    }
}
