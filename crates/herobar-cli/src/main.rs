use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use herobar_core::HeaderConfig;

mod commands;

#[derive(Parser)]
#[command(name = "herobar")]
#[command(author, version, about = "Collapsing header with carousel and pull-to-refresh, in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Read configuration from this file instead of ~/.config/herobar/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config_path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive terminal demo
    Run {
        /// How long the stand-in refresh takes, in milliseconds
        #[arg(long, default_value_t = 2000)]
        refresh_ms: u64,
        /// Make every refresh fail with this message
        #[arg(long)]
        fail_refresh: Option<String>,
    },
    /// Replay a JSON input script and print events and snapshots as JSON lines
    Simulate {
        /// Script file (`-` for stdin)
        script: PathBuf,
        /// How long each refresh takes, in milliseconds of virtual time
        #[arg(long, default_value_t = 2000)]
        refresh_ms: u64,
        /// Make every refresh fail with this message
        #[arg(long)]
        fail_refresh: Option<String>,
    },
    /// Inspect or initialize the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration file path
    Path,
    /// Print the effective configuration as TOML
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Install the tracing subscriber; the TUI logs to a file so it cannot
/// scribble over the alternate screen
fn init_logging(config: &HeaderConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // These must work even when the existing file does not parse
    if let Some(Commands::Config { action }) = &cli.command {
        match action {
            ConfigAction::Path => return commands::config::path(cli.config_path.as_deref()),
            ConfigAction::Init { force } => {
                return commands::config::init(cli.config_path.as_deref(), *force)
            }
            ConfigAction::Show => {}
        }
    }

    // Load configuration
    let config = match &cli.config_path {
        Some(path) => HeaderConfig::load_from(path)?,
        None => HeaderConfig::load()?,
    };

    let tui = matches!(cli.command, Some(Commands::Run { .. }) | None);
    init_logging(&config, tui)?;

    // Handle commands
    match cli.command {
        Some(Commands::Run {
            refresh_ms,
            fail_refresh,
        }) => commands::run::run(config, refresh_ms, fail_refresh).await,
        None => commands::run::run(config, 2000, None).await,
        Some(Commands::Simulate {
            script,
            refresh_ms,
            fail_refresh,
        }) => commands::simulate::run(&config, &script, refresh_ms, fail_refresh),
        Some(Commands::Config { .. }) => commands::config::show(&config),
    }
}
