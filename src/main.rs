//! Coding tracker CLI - record and report coding sessions

use clap::Parser;
use coding_tracker::cli::{self, Command};
use coding_tracker::{Config, Database, SessionStore};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "coding-tracker")]
#[command(version)]
#[command(about = "Coding tracker - record coding sessions and report time spent", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "~/.coding-tracker/config.toml")]
    config: PathBuf,

    /// Override the database file
    #[arg(long)]
    db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Initialize a new config file with defaults
    #[arg(long)]
    init: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so command output on stdout stays clean
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("coding_tracker={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = coding_tracker::config::expand_path(&args.config);

    if args.init {
        if config_path.exists() {
            tracing::warn!("Config file already exists: {}", config_path.display());
            return Ok(());
        }
        Config::create_default(&config_path)?;
        tracing::info!("Created default config at: {}", config_path.display());
        return Ok(());
    }

    let mut config = if config_path.exists() {
        Config::from_file(&config_path)?
    } else {
        tracing::debug!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        Config::default()
    };
    config.apply_env_overrides();

    if let Some(db) = args.db {
        config.database.path = db;
    }

    let Some(command) = args.command else {
        anyhow::bail!("no command given, see --help");
    };

    let db = Database::new(config.db_path())?;
    tracing::debug!("Using database at {}", db.path().display());
    let store = SessionStore::new(db, &config.seed)?;

    let stdout = std::io::stdout();
    cli::run(&store, command, &mut stdout.lock())?;

    Ok(())
}
