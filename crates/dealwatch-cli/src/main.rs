mod run;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dealwatch")]
#[command(about = "Scrape UK deal sites and announce new deals to a Discord webhook")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape every enabled source once and announce unseen deals (default)
    Run {
        /// Only scrape the named source (case-insensitive)
        #[arg(long)]
        source: Option<String>,

        /// Maximum pages per source; overrides DEALWATCH_MAX_PAGES
        #[arg(long)]
        max_pages: Option<u32>,

        /// Search term; overrides DEALWATCH_SEARCH_TERM
        #[arg(long)]
        search: Option<String>,

        /// Print new deals without notifying or updating the seen-deals file
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = dealwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let request = match cli.command {
        Some(Commands::Run {
            source,
            max_pages,
            search,
            dry_run,
        }) => run::RunRequest {
            source,
            max_pages,
            search,
            dry_run,
        },
        None => run::RunRequest::default(),
    };

    run::run_scrape(&config, request).await
}
