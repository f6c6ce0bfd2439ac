pub mod attend;
pub mod calendars;
pub mod games;
pub mod sync;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use hammers_core::{GameSnapshot, HammersConfig, SyncEngine};
use hammers_provider_google::{AppConfig, GoogleCalendarClient, Session};
use tracing::debug;

pub type GoogleEngine = SyncEngine<GoogleCalendarClient<Session>>;

/// Everything a command needs from disk.
pub struct Context {
    pub config_path: PathBuf,
    pub config: HammersConfig,
}

impl Context {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => HammersConfig::config_path()?,
        };
        let config = HammersConfig::load_from(&config_path)?;
        debug!(
            path = %config_path.display(),
            calendars = config.calendars.len(),
            "Loaded configuration"
        );

        Ok(Context {
            config_path,
            config,
        })
    }

    pub fn save_config(&self) -> Result<()> {
        self.config.save_to(&self.config_path)?;
        Ok(())
    }

    pub fn engine(&self) -> Result<GoogleEngine> {
        let session = Session::load(AppConfig::load()?)?;
        let client =
            GoogleCalendarClient::new(session).context("Invalid Google Calendar API base URL")?;

        Ok(SyncEngine::new(client, self.config.renderer()?))
    }

    pub fn snapshot(&self) -> Result<GameSnapshot> {
        let path = self.config.games_path();
        let snapshot = GameSnapshot::load(&path)?;
        debug!(path = %path.display(), games = snapshot.len(), "Loaded game snapshot");
        Ok(snapshot)
    }
}
