//! Sitecap main entry point
//!
//! This is the command-line interface for Sitecap. The JSON payload is written
//! to stdout; logs go to stderr.

use chrono::Utc;
use clap::Parser;
use sitecap::config::{load_config_with_hash, validate, Config, ExpansionPolicy};
use sitecap::crawler::crawl;
use sitecap::output::{
    generate_markdown_summary, log_statistics, write_json, ErrorPayload, RunSummary,
};
use sitecap::{ErrorKind, SitecapError};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitecap: same-origin link discovery and page capture
///
/// Sitecap discovers the pages linked from a seed URL on the same origin,
/// merges the site's sitemap, and can capture a full-page screenshot of
/// every page it finds.
#[derive(Parser, Debug)]
#[command(name = "sitecap")]
#[command(version = "1.0.0")]
#[command(about = "Same-origin link discovery and page capture", long_about = None)]
struct Cli {
    /// Seed URL to start discovery from
    #[arg(value_name = "URL")]
    seed: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Capture a screenshot of every discovered page
    #[arg(long)]
    capture: bool,

    /// Keep expanding until no new links are found or the cap is reached
    #[arg(long)]
    fixed_point: bool,

    /// Directory for screenshots (overrides capture.output-dir)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Write a markdown summary of the run to this path
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Pretty-print the JSON payload
    #[arg(long)]
    pretty: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(&cli).await {
        tracing::error!("{}", e);
        write_json(std::io::stdout().lock(), &ErrorPayload::from(&e), cli.pretty)?;

        let code = match e.kind() {
            ErrorKind::Input => 2,
            ErrorKind::Internal => 1,
        };
        std::process::exit(code);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitecap=info,warn"),
            1 => EnvFilter::new("sitecap=debug,info"),
            2 => EnvFilter::new("sitecap=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads configuration and applies command-line overrides
fn load_settings(cli: &Cli) -> Result<(Config, Option<String>), SitecapError> {
    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if cli.capture {
        config.capture.enabled = true;
    }
    if cli.fixed_point {
        config.crawler.expansion = ExpansionPolicy::FixedPoint;
    }
    if let Some(dir) = &cli.output_dir {
        config.capture.output_dir = dir.clone();
    }
    validate(&config)?;

    Ok((config, config_hash))
}

/// Runs one crawl and writes its payload
async fn run(cli: &Cli) -> Result<(), SitecapError> {
    let (config, config_hash) = load_settings(cli)?;

    let started_at = Utc::now();
    let output = crawl(&config, &cli.seed).await?;
    let finished_at = Utc::now();

    log_statistics(&output.report.stats);

    if let Some(path) = &cli.summary {
        let summary = RunSummary {
            seed: output.report.seed.to_string(),
            started_at,
            finished_at,
            config_hash,
            stats: output.report.stats.clone(),
            links: output.report.links.clone(),
            captures: output.captures.clone(),
        };
        generate_markdown_summary(&summary, path)?;
        tracing::info!("Summary written to {}", path.display());
    }

    write_json(std::io::stdout().lock(), &output.into_payload(), cli.pretty)?;
    Ok(())
}
