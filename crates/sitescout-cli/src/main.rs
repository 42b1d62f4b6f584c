use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod bootstrap;
mod commands;
mod render;

use bootstrap::AppContext;

#[derive(Parser)]
#[command(name = "sitescout")]
#[command(about = "SiteScout - grounded website intelligence reports", long_about = None)]
struct Cli {
    /// Directory holding config.toml and secret.json
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Directory holding the analysis history
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a website and print its intelligence report
    Analyze {
        domain: String,
        /// Ignore the cached report and call the model again
        #[arg(long)]
        fresh: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ask one follow-up question about an analyzed website
    Ask { domain: String, question: String },
    /// Start an interactive follow-up chat about a website
    Chat { domain: String },
    /// Manage the analysis history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List cached analyses, most recent first
    List,
    /// Print a cached report
    Show { id: String },
    /// Remove one cached analysis
    Remove { id: String },
    /// Remove every cached analysis
    Clear,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish()
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = AppContext::load(cli.config_dir.as_deref(), cli.data_dir.as_deref())?;

    match cli.command {
        Commands::Analyze {
            domain,
            fresh,
            json,
        } => commands::analyze::run(&ctx, &domain, fresh, json).await?,
        Commands::Ask { domain, question } => commands::chat::ask(&ctx, &domain, &question).await?,
        Commands::Chat { domain } => commands::chat::repl(&ctx, &domain).await?,
        Commands::History { action } => match action {
            HistoryAction::List => commands::history::list(&ctx).await,
            HistoryAction::Show { id } => commands::history::show(&ctx, &id).await?,
            HistoryAction::Remove { id } => commands::history::remove(&ctx, &id).await?,
            HistoryAction::Clear => commands::history::clear(&ctx).await?,
        },
    }

    Ok(())
}
