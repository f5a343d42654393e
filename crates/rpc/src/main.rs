//! Ripple CLI - Main entry point

use clap::{Parser, Subcommand};
use ripple_rpc::{commands, AppContext};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ripple")]
#[command(about = "Ripple - multi-vector provenance ledger", long_about = None)]
struct Cli {
    /// JSON configuration file (RIPPLE_* environment variables override it)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a freshly generated event id
    NewId,

    /// Execute a JSON operation script against a fresh ledger
    Run {
        /// Path to the script (a JSON array of operations)
        script: PathBuf,
        /// Stop at the first failing operation
        #[arg(long)]
        fail_fast: bool,
    },

    /// Run the built-in theft → return → proof scenario
    Demo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ripple_ledger=info,ripple_bus=info,ripple_rpc=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Commands::NewId = cli.command {
        commands::new_id();
        return Ok(());
    }

    let ctx = AppContext::from_config_file(cli.config.as_deref())?;

    let outcome = match cli.command {
        Commands::Run { script, fail_fast } => {
            commands::run(&ctx, &script, fail_fast).map(|_| ())
        }
        Commands::Demo => commands::demo(&ctx).map(|_| ()),
        Commands::NewId => Ok(()),
    };

    ctx.shutdown().await;
    outcome
}
