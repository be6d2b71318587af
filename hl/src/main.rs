//! HeroLog - game profile snapshot tracker
//!
//! CLI entry point for ingesting profiles and inspecting per-user history.

use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use herolog::cli::{Cli, Command, OutputFormat, get_log_path};
use herolog::config::Config;
use herolog::ingest::GUIDE;
use herolog::progress::estimate_with;
use herolog::state::{StateError, StateManager};
use herolog::{IngestOutcome, Ingestor, compare_profiles, parse};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Logging isn't initialized yet, so nothing here can trace
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(store_dir = %config.storage.store_dir.display(), "HeroLog loaded config");

    // Dispatch command
    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Ingest { user, file, at } => cmd_ingest(&config, &user, file.as_deref(), at.as_deref()).await,
        Command::Parse { file, format } => cmd_parse(file.as_deref(), format),
        Command::Diff { user } => cmd_diff(&config, &user).await,
        Command::Eta { user } => cmd_eta(&config, &user).await,
        Command::History { user, limit, format } => cmd_history(&config, &user, limit, format).await,
        Command::Clear { user } => cmd_clear(&config, &user).await,
        Command::Users => cmd_users(&config).await,
        Command::Guide => {
            println!("{}", GUIDE);
            Ok(())
        }
    }
}

fn spawn_state(config: &Config) -> Result<StateManager> {
    StateManager::spawn(&config.storage.store_dir, config.storage.history_capacity)
        .context(format!("Failed to open history at {}", config.storage.store_dir.display()))
}

/// Read profile text from a file, or stdin when no file is given
fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path).context(format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

async fn cmd_ingest(config: &Config, user: &str, file: Option<&Path>, at: Option<&str>) -> Result<()> {
    debug!(%user, ?file, ?at, "cmd_ingest: called");
    let raw = read_input(file)?;
    let received_at = match at {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .context(format!("Invalid --at timestamp: {}", s))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let state = spawn_state(config)?;
    let ingestor = Ingestor::new(state.clone(), config.ingest.clone());
    let outcome = ingestor.ingest(user, &raw, received_at).await?;
    state.shutdown().await?;

    match &outcome {
        IngestOutcome::Ignored => println!("{}", "Not a profile, ignored".dimmed()),
        IngestOutcome::Rejected { message } => println!("{}", message.red()),
        IngestOutcome::Duplicate { warning } => println!("{}", warning.yellow()),
        IngestOutcome::Stored { report, .. } => println!("{}", report.green()),
    }
    Ok(())
}

fn cmd_parse(file: Option<&Path>, format: OutputFormat) -> Result<()> {
    debug!(?file, ?format, "cmd_parse: called");
    let raw = read_input(file)?;
    let profile = parse(&raw, Utc::now()).context("Failed to parse profile")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&profile)?),
        OutputFormat::Text => {
            println!("{} {}", profile.name.bold(), format!("(level {})", profile.level).cyan());
            println!("Guild:        {}", profile.guild.as_deref().unwrap_or("No Guild"));
            println!("Health:       {}/{}", profile.current_health, profile.max_health);
            println!("Energy:       {}/{}", profile.current_energy, profile.max_energy);
            println!("Energy spent: {}", profile.energy_spent_today);
            println!("Attack:       {}", profile.attack);
            println!("Defense:      {}", profile.defense);
            println!("Hero power:   {}", profile.hero_power);
            println!(
                "Experience:   {}/{} ({} to go)",
                profile.current_experience,
                profile.next_level_experience,
                profile.xp_to_next_level()
            );
            println!("Gold:         {}", profile.gold);
        }
    }
    Ok(())
}

async fn cmd_diff(config: &Config, user: &str) -> Result<()> {
    debug!(%user, "cmd_diff: called");
    let state = spawn_state(config)?;
    let history = state.history(user).await?;
    state.shutdown().await?;

    match history.as_slice() {
        [.., old, new] => println!("{}", compare_profiles(old, new)),
        _ => println!("{}", "Need at least two snapshots to compare".yellow()),
    }
    Ok(())
}

async fn cmd_eta(config: &Config, user: &str) -> Result<()> {
    debug!(%user, "cmd_eta: called");
    let state = spawn_state(config)?;
    let latest = match state.latest_required(user).await {
        Ok(latest) => latest,
        Err(StateError::NotFound(_)) => {
            state.shutdown().await?;
            println!("{}", format!("No history for user {}", user).yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let history = state.history(user).await?;
    state.shutdown().await?;

    let thresholds = config.progress.thresholds();
    match estimate_with(&latest, &history, &thresholds) {
        Some(0) => println!("{}", "Ready to level up now".green()),
        Some(days) => println!(
            "~{} day(s) to level {} ({} XP to go)",
            days.to_string().bold(),
            latest.level.saturating_add(1),
            latest.xp_to_next_level()
        ),
        None => println!("{}", "Not enough data to estimate".yellow()),
    }
    Ok(())
}

async fn cmd_history(config: &Config, user: &str, limit: Option<usize>, format: OutputFormat) -> Result<()> {
    debug!(%user, ?limit, ?format, "cmd_history: called");
    let state = spawn_state(config)?;
    let history = state.history(user).await?;
    state.shutdown().await?;

    let skip = limit.map_or(0, |n| history.len().saturating_sub(n));
    let shown = &history[skip..];

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(shown)?),
        OutputFormat::Text => {
            if shown.is_empty() {
                println!("No history for user {}", user);
            }
            for profile in shown {
                println!(
                    "{}  {}",
                    profile.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                    profile.summary()
                );
            }
        }
    }
    Ok(())
}

async fn cmd_clear(config: &Config, user: &str) -> Result<()> {
    debug!(%user, "cmd_clear: called");
    let state = spawn_state(config)?;
    let existed = state.clear(user).await?;
    state.shutdown().await?;

    if existed {
        println!("{} history for {}", "Cleared".green(), user);
    } else {
        println!("No history for user {}", user);
    }
    Ok(())
}

async fn cmd_users(config: &Config) -> Result<()> {
    debug!("cmd_users: called");
    let state = spawn_state(config)?;
    let users = state.users().await?;
    state.shutdown().await?;

    if users.is_empty() {
        println!("No users yet");
    }
    for user in users {
        println!("{}", user);
    }
    Ok(())
}
