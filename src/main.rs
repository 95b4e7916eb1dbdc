//! Unidup - superseded-installation cleaner
//!
//! Inventories software installation records, detects which records are
//! superseded duplicates of other records, and safely removes the
//! superseded ones while preserving anything that might still be required.

use clap::Parser;

mod classify;
mod cli;
mod commands;
mod engine;
mod error;
mod grouping;
mod inventory;
mod operations;
mod oracle;
mod progress;
mod record;
mod removal;
mod report;
mod rules;
mod version;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scan(args) => commands::scan::run(cli.verbose, args),
        Commands::Clean(args) => commands::clean::run(cli.verbose, args),
        Commands::Rules(args) => commands::rules::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
