//! CommentScope CLI
//!
//! Analyzes customer comments from the command line: per-comment category,
//! aspects, location, dual sentiment and a business recommendation, plus
//! location reports over the labeled dataset.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commentscope_analyzer::{
    city_trends, regional_performance, AnalysisContext, Analyzer, CityTrends, LocationAnalytics,
    RegionalPerformanceReport,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

mod config;

#[derive(Parser, Debug)]
#[command(name = "commentscope")]
#[command(about = "Customer comment analysis and recommendations", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "commentscope.yaml")]
    config: String,

    /// Labeled dataset (JSON, JSON lines or YAML)
    #[arg(short, long, global = true)]
    dataset: Option<PathBuf>,

    /// Recommendation rule table (YAML)
    #[arg(short, long, global = true)]
    rules: Option<PathBuf>,

    /// Skip loading the learned sentiment model
    #[arg(long, global = true)]
    no_model: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print Prometheus metrics after the command
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a single comment
    Analyze {
        /// Comment text
        text: String,
    },

    /// Analyze every non-empty line of a file, one JSON result per line
    Batch {
        /// Input file, one comment per line
        file: PathBuf,
    },

    /// Location analytics over the dataset
    Report {
        /// Restrict city performance to one city
        #[arg(long)]
        city: Option<String>,

        /// Number of cities in the performance listing
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Dataset insights for the locations a comment names
    Insights {
        /// Comment text
        text: String,
    },

    /// Model and component status
    Health,
}

#[derive(Serialize)]
struct Report {
    location_analytics: LocationAnalytics,
    city_trends: CityTrends,
    regional_performance: RegionalPerformanceReport,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Initialize metrics before any analysis records to the facade
    let metrics_handle = if cli.metrics {
        Some(init_metrics()?)
    } else {
        None
    };

    // Load configuration
    let config = config::load(&cli.config, &cli)?;
    info!(dataset = %config.dataset.display(), "Configuration loaded");

    let context = AnalysisContext::build(config)
        .await
        .context("Failed to initialize analysis context")?;
    let analyzer = Analyzer::new(Arc::new(context));

    run(&analyzer, &cli.command).await?;

    if let Some(handle) = metrics_handle {
        println!("{}", handle.render());
    }
    Ok(())
}

async fn run(analyzer: &Analyzer, command: &Command) -> Result<()> {
    match command {
        Command::Analyze { text } => {
            let analysis = analyzer.analyze(text).await?;
            print_pretty(&analysis)?;
        }
        Command::Batch { file } => {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
            info!(comments = lines.len(), "Running batch analysis");

            let results = analyzer.analyze_batch(lines).await;
            for result in results {
                let line = match result {
                    Ok(analysis) => serde_json::to_string(&analysis)?,
                    Err(e) => {
                        warn!(error = %e, "Comment skipped");
                        serde_json::json!({ "error": e.to_string() }).to_string()
                    }
                };
                println!("{line}");
            }
        }
        Command::Report { city, limit } => {
            let location_analytics = analyzer.location_analytics().await;
            let trends = city_trends(&location_analytics, city.as_deref(), *limit)?;
            let performance = regional_performance(&location_analytics);
            print_pretty(&Report {
                location_analytics,
                city_trends: trends,
                regional_performance: performance,
            })?;
        }
        Command::Insights { text } => match analyzer.location_insights(text).await? {
            Some(insights) => print_pretty(&insights)?,
            None => print_pretty(&serde_json::json!({
                "message": "No location detected in the provided text"
            }))?,
        },
        Command::Health => print_pretty(&analyzer.health())?,
    }
    Ok(())
}

fn print_pretty<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize tracing/logging. Output goes to stderr so stdout stays JSON.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("commentscope=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("commentscope=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Install the Prometheus recorder and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "commentscope_analyses_total",
        "Total number of comments analyzed"
    );
    metrics::describe_counter!(
        "commentscope_fallbacks_total",
        "Analyses that used a degraded path, by kind"
    );
    metrics::describe_histogram!(
        "commentscope_analysis_latency_us",
        metrics::Unit::Microseconds,
        "Per-comment analysis latency in microseconds"
    );

    info!("Metrics recorder installed");
    Ok(handle)
}
