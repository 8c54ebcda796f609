//! Inkfeed main entry point
//!
//! Command-line interface for assembling a normalized feed from one of the
//! built-in site adapters and printing it as JSON.

use clap::Parser;
use inkfeed::adapter::AdapterRegistry;
use inkfeed::config::{load_config_with_hash, Config};
use inkfeed::pipeline::Pipeline;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Inkfeed: a site-to-feed normalization pipeline
///
/// Fetches a site's listing, resolves and enriches its items through a
/// single-flight cache, and prints the assembled feed as JSON.
#[derive(Parser, Debug)]
#[command(name = "inkfeed")]
#[command(version)]
#[command(about = "Normalize site-specific content into a uniform feed", long_about = None)]
struct Cli {
    /// Site slug to assemble a feed for (see --list-sites)
    #[arg(value_name = "SITE", required_unless_present = "list_sites")]
    site: Option<String>,

    /// Category within the site (defaults to the site's documented default,
    /// where one exists)
    #[arg(value_name = "CATEGORY")]
    category: Option<String>,

    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// List registered site slugs and exit
    #[arg(long)]
    list_sites: bool,

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

    setup_logging(cli.verbose, cli.quiet);

    let registry = AdapterRegistry::with_builtin();

    if cli.list_sites {
        for slug in registry.slugs() {
            println!("{}", slug);
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    // Required unless --list-sites short-circuits above.
    let site = cli.site.as_deref().unwrap_or_default();

    let pipeline = Pipeline::new(&config)?;
    let feed = pipeline
        .run_site(&registry, site, cli.category.as_deref())
        .await?;

    tracing::info!(items = feed.items.len(), "feed assembled");

    let output = if cli.pretty {
        serde_json::to_string_pretty(&feed)?
    } else {
        serde_json::to_string(&feed)?
    };
    println!("{}", output);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("inkfeed=info,warn"),
            1 => EnvFilter::new("inkfeed=debug,info"),
            2 => EnvFilter::new("inkfeed=trace,debug"),
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
