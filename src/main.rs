mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hammers_core::{CalendarError, GameId};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hammers")]
#[command(about = "Publish West Ham fixtures and ticket dates to Google calendars")]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of ~/.config/hammers/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bring every configured calendar in line with the game snapshot
    Sync {
        /// Only sync this calendar (by kind or title)
        #[arg(short, long)]
        calendar: Option<String>,
    },
    /// Mark a game as attended and move it to the attended calendar
    Attend { game_id: GameId },
    /// Mark a game as not attended and move it back to the unattended calendar
    Unattend { game_id: GameId },
    /// List remote calendars
    Calendars {
        /// Create missing calendars and update the rest from the config
        #[arg(long)]
        ensure: bool,
    },
    /// List the games in the snapshot
    Games {
        /// Only show this season
        #[arg(short, long)]
        season: Option<u16>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = commands::Context::load(cli.config)?;

    let result = match cli.command {
        Commands::Sync { calendar } => commands::sync::run(&ctx, calendar.as_deref()).await,
        Commands::Attend { game_id } => commands::attend::run(&ctx, game_id, true).await,
        Commands::Unattend { game_id } => commands::attend::run(&ctx, game_id, false).await,
        Commands::Calendars { ensure } => commands::calendars::run(ctx, ensure).await,
        Commands::Games { season } => commands::games::run(&ctx, season),
    };

    if let Err(err) = &result {
        let needs_auth = err
            .downcast_ref::<CalendarError>()
            .is_some_and(CalendarError::is_authentication_required);
        if needs_auth {
            eprintln!(
                "{}",
                "Google rejected the stored credentials. Authorise again and save the new \
                tokens to ~/.config/hammers/google/session.toml."
                    .yellow()
            );
        }
    }

    result
}
