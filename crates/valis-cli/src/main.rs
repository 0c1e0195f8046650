use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "valis", version)]
#[command(about = "Valis CLI - simulated autonomous task execution", long_about = None)]
struct Cli {
    /// Log filter, e.g. "info" or "valis_execution=debug"
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a request without starting a task
    Classify {
        #[arg(required = true)]
        text: Vec<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run one simulated task to completion
    Simulate {
        #[arg(required = true)]
        text: Vec<String>,
        /// Simulator config file (defaults to ~/.config/valis/simulator.toml)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Print snapshots and events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Print the effective simulator configuration
    Config {
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Classify { text, json } => commands::classify::run(&text.join(" "), json)?,
        Commands::Simulate { text, config, json } => {
            commands::simulate::run(&text.join(" "), config.as_deref(), json).await?
        }
        Commands::Config { config } => commands::config::show(config.as_deref())?,
    }

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
