use clap::Parser;
use email_delivery::SmtpDelivery;
use interfaces::NullDelivery;
use rss_aggregator::{DigestConfig, DigestRunner, FetchConfig, HttpFeedRetriever, RunOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Daily digest of high-signal enterprise AI headlines for higher education.
#[derive(Debug, Parser)]
#[command(name = "ai-news-digest", version)]
struct Cli {
    /// Path to the JSON configuration (sources, keywords, categories, settings)
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Also pull the weekly sources, with a 7-day lookback
    #[arg(long)]
    weekly: bool,

    /// Minimum relevance score; overrides settings.min_relevance_score
    #[arg(long, env = "MIN_RELEVANCE_SCORE")]
    min_relevance_score: Option<f64>,

    /// Render and print the text digest instead of emailing it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("Digest run failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = DigestConfig::load_or_default(&cli.config);
    let retriever = HttpFeedRetriever::new(FetchConfig::default())?;
    let options = RunOptions {
        include_weekly: cli.weekly,
        min_relevance_override: cli.min_relevance_score,
    };

    if cli.dry_run {
        info!("Dry run: digest will be printed, not sent");
        let report = DigestRunner::new(config, retriever, NullDelivery).run(&options).await;
        println!("{}", report.digest.text);
        return Ok(true);
    }

    let delivery = SmtpDelivery::from_env()?;
    let report = DigestRunner::new(config, retriever, delivery).run(&options).await;

    if report.delivery.is_delivered() {
        info!("Daily digest sent successfully (run {})", report.run_id);
    } else {
        error!("Failed to send daily digest (run {})", report.run_id);
    }
    Ok(report.delivery.is_delivered())
}
