//! xtask - Development task runner for persistent-treap
//!
//! Usage:
//!   cargo xtask chain --count <n> [--seed <s>]
//!   cargo xtask stress [--scenario <yaml>] [options]

mod chain;
mod stress;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development task runner for persistent-treap")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a chain of versions and check that each one is isolated
    Chain(chain::ChainArgs),
    /// Run random operations in lockstep with BTreeMap
    Stress(stress::StressArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chain(args) => chain::run(&args),
        Commands::Stress(args) => stress::run(&args),
    }
}
