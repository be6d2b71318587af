use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use historystore::HistoryStore;
use historystore::cli::{Cli, Command};
use historystore::config::Config;

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("historystore starting");

    let store = HistoryStore::open(&config.store_path)
        .with_context(|| format!("Failed to open store at {}", config.store_path.display()))?;
    info!("Using store at {}", store.path().display());

    match cli.command {
        Command::List => {
            let keys = store.keys()?;
            if keys.is_empty() {
                println!("No histories found");
            } else {
                for key in keys {
                    println!("{}", key);
                }
            }
        }
        Command::Show { key, last } => {
            let records: Vec<serde_json::Value> = store.load(&key)?;
            let skip = last.map(|n| records.len().saturating_sub(n)).unwrap_or(0);
            for (idx, record) in records.iter().enumerate().skip(skip) {
                println!("{} {}", format!("{:3}", idx + 1).dimmed(), record);
            }
        }
        Command::Stats { key } => {
            let stats = store.stats(&key)?;
            println!("Key: {}", key.cyan());
            println!("  Records: {}", stats.record_count);
            println!("  Total bytes: {}", stats.total_bytes);
        }
        Command::Delete { key } => {
            if store.delete(&key)? {
                println!("{} Deleted history: {}", "✓".green(), key);
            } else {
                println!("No history for {}", key);
            }
        }
    }

    Ok(())
}
