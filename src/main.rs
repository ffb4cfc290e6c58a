//! Kind-Scraper main entry point
//!
//! This is the command-line interface for the Kind-Scraper single-page scraper.

use anyhow::Context;
use clap::Parser;
use kind_scraper::config::{load_config_with_hash, parse_header, Config, OutputFormat};
use kind_scraper::output::{write_report, ScrapeReport};
use kind_scraper::{
    FailureKind, FetchOptions, PolicyResolver, ReqwestFetcher, ScrapeError, ScrapeOptions,
    Scraper,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Kind-Scraper: A polite single-page scraper
///
/// Kind-Scraper checks the site's robots.txt, waits a courtesy delay, fetches the
/// page and prints its title and up to three unique links.
#[derive(Parser, Debug)]
#[command(name = "kind-scraper")]
#[command(version)]
#[command(about = "A polite single-page scraper", long_about = None)]
struct Cli {
    /// The page to scrape
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Extra request header, e.g. -H 'Accept-Language: en' (repeatable)
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
    headers: Vec<String>,

    /// Page request timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Only report whether robots.txt allows the URL
    #[arg(long)]
    check_robots: bool,

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
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

/// Maps a top-level error to the process exit code
///
/// Scrape failures get the code of their kind; anything else is a setup failure (1).
fn exit_code_for(error: &anyhow::Error) -> u8 {
    error
        .downcast_ref::<ScrapeError>()
        .map(|scrape_error| scrape_error.kind().exit_code())
        .unwrap_or(1)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kind_scraper=info,warn"),
            1 => EnvFilter::new("kind_scraper=debug,info"),
            2 => EnvFilter::new("kind_scraper=trace,debug"),
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

/// Loads the configuration file if one was given, otherwise the defaults
fn load_configuration(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Builds per-call options from the command line
fn scrape_options(cli: &Cli) -> anyhow::Result<ScrapeOptions> {
    let mut options = ScrapeOptions::new();

    for raw in &cli.headers {
        let (name, value) = parse_header(raw)?;
        options = options.header(name, value);
    }

    if let Some(timeout) = cli.timeout {
        options = options.timeout(Duration::from_millis(timeout));
    }

    Ok(options)
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_configuration(cli.config.as_ref())?;

    if cli.check_robots {
        return handle_check_robots(&cli, &config).await;
    }

    let options = scrape_options(&cli)?;
    let scraper = Scraper::new(config.scraper.clone()).context("failed to build HTTP client")?;

    let result = scraper.scrape(&cli.url, &options).await?;

    let format = if cli.json {
        OutputFormat::Json
    } else {
        config.output.format
    };
    let report = ScrapeReport::new(cli.url.as_str(), result);
    write_report(&mut std::io::stdout().lock(), &report, format)?;

    Ok(ExitCode::SUCCESS)
}

/// Handles the --check-robots mode: reports the robots.txt decision and exits
async fn handle_check_robots(cli: &Cli, config: &Config) -> anyhow::Result<ExitCode> {
    let fetcher = ReqwestFetcher::new().context("failed to build HTTP client")?;
    let resolver = PolicyResolver::new(&fetcher, FetchOptions::for_robots(&config.scraper));

    let (line, code) = robots_verdict(&cli.url, resolver.is_allowed(&cli.url).await);
    println!("{}", line);
    Ok(ExitCode::from(code))
}

/// Renders the --check-robots decision and its exit code
fn robots_verdict(url: &str, allowed: bool) -> (String, u8) {
    if allowed {
        (format!("allowed: {}", url), 0)
    } else {
        (
            format!("disallowed: {}", url),
            FailureKind::PolicyDenied.exit_code(),
        )
    }
}
