//! CLI argument parsing for historystore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hs")]
#[command(author, version, about = "Bounded per-key history store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all keys with stored history
    List,

    /// Print the records stored for a key, oldest first
    Show {
        /// Key (user id)
        #[arg(required = true)]
        key: String,

        /// Only show the newest N records
        #[arg(short = 'n', long)]
        last: Option<usize>,
    },

    /// Show statistics for a key
    Stats {
        /// Key (user id)
        #[arg(required = true)]
        key: String,
    },

    /// Delete a key and its history
    Delete {
        /// Key (user id)
        #[arg(required = true)]
        key: String,
    },
}
