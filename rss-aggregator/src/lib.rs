pub mod types;
pub mod config;
pub mod fetcher;
pub mod parser;
pub mod traits;
pub mod scorer;
pub mod categorizer;
pub mod aggregator;
pub mod digest;
pub mod runner;
pub mod utils;
pub mod rss_utils;

pub use types::*;
pub use config::{DigestConfig, Settings};
pub use fetcher::{Fetcher, HttpFeedRetriever};
pub use parser::FeedParser;
pub use traits::FeedRetriever;
pub use scorer::Scorer;
pub use categorizer::Categorizer;
pub use aggregator::{Aggregation, RssAggregator};
pub use digest::DigestRenderer;
pub use runner::{DeliveryStatus, DigestRunner, RunReport};
