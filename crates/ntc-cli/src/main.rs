use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // logs go to stderr so stdout stays clean for piping JSON results
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    match &cli.command {
        Commands::Search(args) => commands::search::handle(args),
        Commands::Batch(args) => commands::batch::handle(args),
    }
}
