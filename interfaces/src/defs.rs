use chrono::{DateTime, Utc};

/// A named feed the aggregator pulls from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiveSourceSpec {
    pub name: String,
    pub uri: String,
}

impl LiveSourceSpec {
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
        }
    }
}

/// One entry as handed over by feed retrieval, before any enrichment.
#[derive(Clone, Debug, PartialEq)]
pub struct RawEntry {
    pub title: String,
    pub link: String,
    // may still carry markup
    pub summary: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

/// A rendered digest, ready for delivery.
#[derive(Clone, Debug)]
pub struct DigestOutput {
    pub subject: String,
    pub html: String,
    pub text: String,
    pub article_count: usize,
    pub generated_at: DateTime<Utc>,
}

// Object style note:
// Implementations of DigestDelivery run inside a short lived single-run
// process. They read their settings once when constructed and hold no state
// between deliveries.

pub trait DigestDelivery {
    /// Hand the digest to the transport. An error means nothing was delivered.
    fn deliver(&self, digest: &DigestOutput) -> anyhow::Result<()>;

    fn channel_name(&self) -> String;
}
