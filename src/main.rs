use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use trendline::config::Config;
use trendline::history::BucketKey;

/// Trendline: hourly topic and trend detection.
///
/// Clusters a batch of link-aggregator items into topics and compares them
/// with the previous hour to find what is emerging, continuing or fading.
#[derive(Parser)]
#[command(name = "trendline", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect topics and trends in a batch of items
    Analyze {
        /// JSON file of items, or `-` for stdin
        #[arg(long)]
        input: PathBuf,

        /// Bucket date (YYYY-MM-DD, default: today)
        #[arg(long, requires = "hour")]
        date: Option<String>,

        /// Bucket hour (00-23, default: current hour)
        #[arg(long, requires = "date")]
        hour: Option<String>,

        /// Force k-means with this many clusters
        #[arg(long)]
        clusters: Option<usize>,

        /// Print the result as JSON instead of the terminal view
        #[arg(long)]
        json: bool,
    },

    /// Show stored topics for a bucket (default: the latest)
    History {
        /// Bucket key, e.g. 2024-06-01_14
        key: Option<String>,
    },

    /// Show store status (backend, bucket count, latest bucket)
    Status,

    /// Delete stored buckets older than a number of hours
    Prune {
        /// Keep buckets from the last N hours (default: 168)
        #[arg(long, default_value = "168")]
        keep_hours: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("trendline=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            date,
            hour,
            clusters,
            json,
        } => {
            let config = Config::load()?;

            let bucket = match (date.as_deref(), hour.as_deref()) {
                (Some(date), Some(hour)) => BucketKey::from_parts(date, hour)?,
                _ => BucketKey::now(),
            };

            let items = trendline::ingest::load_items(&input)?;
            let engine = Arc::new(config.build_engine()?);
            info!(
                store = engine.history().backend_name(),
                bucket = %bucket,
                "Engine ready"
            );

            let spinner = if json {
                None
            } else {
                Some(analysis_spinner(items.len()))
            };

            let outcome = trendline::pipeline::run_with_deadline(
                engine,
                items,
                bucket,
                clusters,
                config.timeout,
            )
            .await;

            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }
            let result = outcome?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                trendline::output::terminal::display_analysis(&result);
            }
        }

        Commands::History { key } => {
            let config = Config::load()?;
            let store = config.open_store()?;

            let key = match key {
                Some(raw) => raw.parse::<BucketKey>()?,
                None => match store.latest()? {
                    Some(latest) => latest,
                    None => {
                        println!("No buckets stored yet. Run `trendline analyze` first.");
                        return Ok(());
                    }
                },
            };

            let topics = store.load(&key);
            trendline::output::terminal::display_bucket(&key.to_string(), &topics);
        }

        Commands::Status => {
            let config = Config::load()?;
            let store = config.open_store()?;
            trendline::status::show(&store, &config)?;
        }

        Commands::Prune { keep_hours } => {
            let config = Config::load()?;
            let store = config.open_store()?;

            let cutoff = BucketKey::now().hours_before(i64::from(keep_hours));
            let removed = store.prune_before(&cutoff)?;

            println!(
                "{}",
                format!("Removed {removed} buckets older than {cutoff}.").bold()
            );
        }
    }

    Ok(())
}

/// Spinner shown while the engine runs on its worker thread.
fn analysis_spinner(item_count: usize) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner} {msg} ({elapsed})") {
        pb.set_style(style);
    }
    pb.set_message(format!("Clustering {item_count} items"));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
