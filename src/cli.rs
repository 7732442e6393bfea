use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;

#[derive(Parser)]
#[command(name = "aoscreener")]
#[command(about = "Hourly EMA20 cross-up screener gated by daily AO < 0", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan one index for triggers
    Scan {
        /// Index name, e.g. "FTSE 100"
        index: String,
        /// Custom index definitions (JSON array of {name, tickers})
        #[arg(short, long)]
        groups_file: Option<PathBuf>,
    },
    /// Show AO<0 counts per index for the most recent days
    Summary {
        /// Write the summary as CSV to this path
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Custom index definitions (JSON array of {name, tickers})
        #[arg(short, long)]
        groups_file: Option<PathBuf>,
    },
    /// List configured indices
    Indices {
        /// Custom index definitions (JSON array of {name, tickers})
        #[arg(short, long)]
        groups_file: Option<PathBuf>,
    },
}

pub fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { index, groups_file } => {
            commands::scan::run(index, groups_file);
        }
        Commands::Summary { csv, groups_file } => {
            commands::summary::run(csv, groups_file);
        }
        Commands::Indices { groups_file } => {
            commands::indices::run(groups_file);
        }
    }
}
