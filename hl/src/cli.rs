//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// HeroLog - game profile snapshot tracker
#[derive(Parser)]
#[command(
    name = "hl",
    about = "Track game profile snapshots, report changes and estimate level-ups",
    version,
    after_help = after_help()
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ingest a pasted profile for a user and print the reply
    Ingest {
        /// User the profile belongs to
        #[arg(short, long)]
        user: String,

        /// Read the profile from a file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Receive time (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<String>,
    },

    /// Parse a profile without storing it
    Parse {
        /// Read the profile from a file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Compare the last two stored snapshots of a user
    Diff {
        #[arg(short, long)]
        user: String,
    },

    /// Estimate days until the user's next level-up
    Eta {
        #[arg(short, long)]
        user: String,
    },

    /// Show a user's stored snapshots
    History {
        #[arg(short, long)]
        user: String,

        /// Show only the most recent N snapshots
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a user's history
    Clear {
        #[arg(short, long)]
        user: String,
    },

    /// List users with stored history
    Users,

    /// Show how to use the tracker
    Guide,
}

/// Output format for parse/history commands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => {
                debug!(%s, "OutputFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use: text or json", s))
            }
        }
    }
}

/// Location of the log file written by `hl`
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("herolog")
        .join("logs")
        .join("herolog.log")
}

fn after_help() -> String {
    format!("Logs are written to: {}", get_log_path().display())
}
