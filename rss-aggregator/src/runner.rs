use crate::aggregator::{Aggregation, RssAggregator};
use crate::config::DigestConfig;
use crate::digest::DigestRenderer;
use crate::traits::FeedRetriever;
use crate::types::{AggregatorError, DigestDelivery, DigestOutput, RunOptions};
use chrono::{DateTime, Utc};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryStatus {
    Delivered { channel: String },
    Failed { channel: String, reason: String },
}

impl DeliveryStatus {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    /// The failure as an error value, for callers that want to propagate it.
    pub fn into_result(self) -> Result<(), AggregatorError> {
        match self {
            Self::Delivered { .. } => Ok(()),
            Self::Failed { channel, reason } => Err(AggregatorError::Delivery {
                channel,
                message: reason,
            }),
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub run_id: Uuid,
    pub aggregation: Aggregation,
    pub digest: DigestOutput,
    pub delivery: DeliveryStatus,
}

/// One scheduled invocation: aggregate, render, deliver. Holds nothing between runs.
pub struct DigestRunner<R, D> {
    config: DigestConfig,
    aggregator: RssAggregator<R>,
    delivery: D,
}

impl<R: FeedRetriever, D: DigestDelivery> DigestRunner<R, D> {
    pub fn new(config: DigestConfig, retriever: R, delivery: D) -> Self {
        Self {
            config,
            aggregator: RssAggregator::new(retriever),
            delivery,
        }
    }

    pub async fn run(&self, options: &RunOptions) -> RunReport {
        self.run_at(options, Utc::now()).await
    }

    pub async fn run_at(&self, options: &RunOptions, now: DateTime<Utc>) -> RunReport {
        let run_id = Uuid::new_v4();
        let span = info_span!("digest_run", %run_id, weekly = options.include_weekly);

        async move {
            info!("AI news digest run started");

            let aggregation = self.aggregator.aggregate(&self.config, options, now).await;
            let digest = DigestRenderer::render(&aggregation.articles, now);

            let channel = self.delivery.channel_name();
            let delivery = match self.delivery.deliver(&digest) {
                Ok(()) => {
                    info!("Digest with {} articles sent via {}", digest.article_count, channel);
                    DeliveryStatus::Delivered { channel }
                }
                Err(e) => {
                    error!("Failed to send digest via {}: {:#}", channel, e);
                    DeliveryStatus::Failed {
                        channel,
                        reason: format!("{:#}", e),
                    }
                }
            };

            info!("AI news digest run completed");
            RunReport {
                run_id,
                aggregation,
                digest,
                delivery,
            }
        }
        .instrument(span)
        .await
    }
}
