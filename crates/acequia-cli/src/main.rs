use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

#[derive(Parser)]
#[command(
    name = "acequia",
    version,
    about = "Permission-gated irrigation decision loop"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, env = "ACEQUIA_CONFIG")]
    config: Option<PathBuf>,

    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default acequia.yaml
    Init,
    /// Run one decision cycle: sense, advise, actuate
    Run {
        /// Instruction passed to the cycle (logged, not yet routed)
        instruction: Option<String>,
    },
    /// Inspect or validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: cmd::config::ConfigSubcommand,
    },
    /// List recorded decision cycles
    Journal {
        /// Show at most this many of the most recent records
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise runs are chatty and everything else is
    // quiet.
    let default_level = match &cli.command {
        Commands::Run { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from("acequia.yaml"));

    let result = match cli.command {
        Commands::Init => cmd::init::run(&config_path, cli.json),
        Commands::Run { instruction } => cmd::run::run(&config_path, instruction, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&config_path, subcommand, cli.json),
        Commands::Journal { limit } => cmd::journal::run(&config_path, limit, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
