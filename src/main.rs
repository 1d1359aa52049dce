//! Outlink-Audit main entry point
//!
//! This is the command-line interface for the external link auditor.

use anyhow::{bail, Context};
use clap::Parser;
use outlink_audit::config::{load_config, load_list, CrawlConfig, RecordingFilter, ScopeMode};
use outlink_audit::crawler::crawl;
use outlink_audit::output::{write_report, CrawlResult};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Outlink-Audit: an external link auditor
///
/// Crawls a site's internal pages breadth-first and reports every outbound
/// link, flagging the ones that point at authority domains.
#[derive(Parser, Debug)]
#[command(name = "outlink-audit")]
#[command(version = "1.0.0")]
#[command(about = "Audit the external links of a website", long_about = None)]
struct Cli {
    /// Site to crawl; https:// is assumed when no scheme is given
    #[arg(value_name = "URL", required_unless_present = "config")]
    url: Option<String>,

    /// Maximum number of pages to visit [default: 500]
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Seconds to wait between pages [default: 0.3]
    #[arg(long, value_name = "SECONDS")]
    delay: Option<f64>,

    /// Report path; a .md extension writes markdown, anything else JSON
    #[arg(short, long, default_value = "external_link_report.json")]
    output: PathBuf,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Which hosts count as internal
    #[arg(long, value_name = "MODE")]
    scope: Option<ScopeMode>,

    /// Extra internal domain for --scope custom-domains (repeatable)
    #[arg(long = "allow-domain", value_name = "DOMAIN")]
    allow_domains: Vec<String>,

    /// Newline-delimited authority domain list, replacing the defaults
    #[arg(long, value_name = "FILE")]
    authority_file: Option<PathBuf>,

    /// Only record pages whose URL contains a pattern (repeatable)
    #[arg(long, value_name = "PATTERN", conflicts_with = "exclude")]
    include: Vec<String>,

    /// Do not record pages whose URL contains a pattern (repeatable)
    #[arg(long, value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(result) if crawl_failed(&result) => {
            tracing::error!("No page of {} could be fetched", result.site);
            ExitCode::from(2)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("outlink_audit=info,warn"),
            1 => EnvFilter::new("outlink_audit=debug,info"),
            2 => EnvFilter::new("outlink_audit=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<CrawlResult> {
    let config = build_config(&cli)?;

    let result = crawl(config).await.context("Crawl could not start")?;

    write_report(&result, &cli.output)
        .with_context(|| format!("Failed to write report to {}", cli.output.display()))?;

    if !cli.quiet {
        print_summary(&result, &cli);
    }

    Ok(result)
}

/// Builds the crawl configuration from the config file (if any) and flags
///
/// Flags take precedence over file values.
fn build_config(cli: &Cli) -> anyhow::Result<CrawlConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => match &cli.url {
            Some(url) => CrawlConfig::new(url),
            None => bail!("A URL or --config file is required"),
        },
    };

    if let (Some(_), Some(url)) = (&cli.config, &cli.url) {
        config.start_url = url.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.max_pages = max_pages;
    }
    if let Some(delay) = cli.delay {
        config.delay = delay;
    }
    if let Some(scope) = cli.scope {
        config.scope = scope;
    }
    if !cli.allow_domains.is_empty() {
        config.custom_domains = cli.allow_domains.clone();
    }
    if let Some(path) = &cli.authority_file {
        config.authority_domains = load_list(path)
            .with_context(|| format!("Failed to read authority list {}", path.display()))?;
    }
    if !cli.include.is_empty() {
        config.filter = RecordingFilter::include_only(cli.include.clone());
    } else if !cli.exclude.is_empty() {
        config.filter = RecordingFilter::exclude(cli.exclude.clone());
    }

    Ok(config)
}

/// True when every visited page failed and nothing was recorded
fn crawl_failed(result: &CrawlResult) -> bool {
    result.pages.is_empty() && result.pages_visited > 0 && result.errors.len() == result.pages_visited
}

fn print_summary(result: &CrawlResult, cli: &Cli) {
    println!();
    println!("=== Audit complete: {} ===", result.base_domain);
    println!("  Pages visited:          {}", result.pages_visited);
    println!("  Pages recorded:         {}", result.total_pages);
    println!("  Pages with outlinks:    {}", result.pages_with_external_links());
    println!("  External links:         {}", result.total_external_links);
    println!("  Unique domains:         {}", result.total_domains);
    println!("  Authority links:        {}", result.authority_link_count());
    println!("  Errors:                 {}", result.errors.len());
    println!();
    println!("Report saved to: {}", cli.output.display());
}
