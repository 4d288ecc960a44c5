use crate::categorizer::Categorizer;
use crate::config::DigestConfig;
use crate::rss_utils::time::{is_within_lookback, lookback_cutoff, WEEKLY_LOOKBACK_HOURS};
use crate::scorer::Scorer;
use crate::traits::FeedRetriever;
use crate::types::{Article, FetchOutcome, LiveSourceSpec, RunOptions};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// What one aggregation pass produced.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Scored, categorized, filtered, sorted and capped.
    pub articles: Vec<Article>,
    /// Articles collected across all sources before filtering.
    pub collected: usize,
    pub failed_sources: Vec<String>,
}

/// Pulls every configured source, then scores, categorizes, filters, sorts
/// and caps the pooled articles. Sources are visited one at a time in
/// declaration order.
pub struct RssAggregator<R> {
    retriever: R,
}

impl<R: FeedRetriever> RssAggregator<R> {
    pub fn new(retriever: R) -> Self {
        Self { retriever }
    }

    pub async fn aggregate(&self, config: &DigestConfig, options: &RunOptions, now: DateTime<Utc>) -> Aggregation {
        let settings = &config.settings;
        let mut pool = Vec::new();
        let mut failed_sources = Vec::new();

        info!("Fetching daily sources...");
        for source in config.daily_specs() {
            self.collect_into(
                &source,
                settings.lookback_hours,
                settings.max_articles_per_source,
                now,
                &mut pool,
                &mut failed_sources,
            )
            .await;
        }

        if options.include_weekly {
            info!("Fetching weekly sources...");
            for source in config.weekly_specs() {
                self.collect_into(
                    &source,
                    WEEKLY_LOOKBACK_HOURS,
                    settings.max_articles_per_source,
                    now,
                    &mut pool,
                    &mut failed_sources,
                )
                .await;
            }
        }

        let collected = pool.len();
        info!("Scoring {} articles...", collected);

        let scorer = Scorer::new(&config.relevance_keywords);
        let categorizer = Categorizer::new(&config.categories);
        let enriched: Vec<Article> = pool
            .into_iter()
            .map(|article| categorizer.assign(scorer.score(article)))
            .collect();

        let min_score = settings.effective_min_score(options.min_relevance_override);
        let articles = rank(enriched, min_score, settings.max_articles_total);

        info!("Found {} high-signal articles (min score {})", articles.len(), min_score);
        if !failed_sources.is_empty() {
            warn!("{} source(s) skipped this run: {}", failed_sources.len(), failed_sources.join(", "));
        }

        Aggregation {
            articles,
            collected,
            failed_sources,
        }
    }

    async fn collect_into(
        &self,
        source: &LiveSourceSpec,
        lookback_hours: i64,
        max_per_source: usize,
        now: DateTime<Utc>,
        pool: &mut Vec<Article>,
        failed_sources: &mut Vec<String>,
    ) {
        info!("  → {}", source.name);
        match self.retriever.retrieve(source).await {
            FetchOutcome::Fetched(entries) => {
                let articles = recent_articles(source, &entries, lookback_hours, max_per_source, now);
                debug!("{}: kept {} of {} entries", source.name, articles.len(), entries.len());
                pool.extend(articles);
            }
            FetchOutcome::Failed { reason } => {
                warn!("Could not fetch {}: {}", source.name, reason);
                failed_sources.push(source.name.clone());
            }
        }
    }
}

/// Builds articles from the first `max_per_source` entries, dropping those
/// dated before the lookback cutoff. The cap applies before the date filter.
pub fn recent_articles(
    source: &LiveSourceSpec,
    entries: &[crate::types::RawEntry],
    lookback_hours: i64,
    max_per_source: usize,
    now: DateTime<Utc>,
) -> Vec<Article> {
    let cutoff = lookback_cutoff(now, lookback_hours);
    entries
        .iter()
        .take(max_per_source)
        .filter(|entry| is_within_lookback(entry.published, cutoff))
        .map(|entry| Article::from_entry(entry, &source.name))
        .collect()
}

/// Keep articles scoring at least `min_score`, best first, at most `max_total`.
/// Equal scores keep their incoming order.
pub fn rank(articles: Vec<Article>, min_score: f64, max_total: usize) -> Vec<Article> {
    let mut relevant: Vec<Article> = articles
        .into_iter()
        .filter(|article| article.relevance_score >= min_score)
        .collect();

    // sort_by is stable
    relevant.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    relevant.truncate(max_total);
    relevant
}
