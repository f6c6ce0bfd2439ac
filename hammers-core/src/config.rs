//! Global configuration at ~/.config/hammers/config.toml

use std::path::{Path, PathBuf};

use chrono::Duration;
use chrono_tz::Tz;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarKind, CalendarTarget, EventRenderer};
use crate::constants::{DEFAULT_CALENDAR_LOCATION, DEFAULT_CLUB_NAME, DEFAULT_TIMEZONE};
use crate::error::{CalendarError, CalendarResult};
use crate::game::Competition;

static DEFAULT_GAMES_PATH: &str = "~/.config/hammers/games.json";

fn default_club_name() -> String {
    DEFAULT_CLUB_NAME.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_calendar_location() -> String {
    DEFAULT_CALENDAR_LOCATION.to_string()
}

fn default_games_path() -> PathBuf {
    PathBuf::from(DEFAULT_GAMES_PATH)
}

fn default_calendars() -> Vec<CalendarConfig> {
    CalendarKind::DEFAULTS
        .into_iter()
        .map(CalendarConfig::new)
        .collect()
}

/// One `[[calendars]]` entry. Unset fields fall back to the kind's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub kind: CalendarKind,

    /// Required for `kind = "competition"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition: Option<Competition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<i64>,

    /// Assigned when the remote calendar is first created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
}

impl CalendarConfig {
    pub fn new(kind: CalendarKind) -> Self {
        CalendarConfig {
            kind,
            competition: None,
            title: None,
            description: None,
            busy: None,
            duration_hours: None,
            remote_id: None,
        }
    }

    pub fn title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| self.kind.default_title(self.competition))
    }

    pub fn description(&self) -> String {
        self.description.clone().unwrap_or_else(|| self.title())
    }

    /// The sync target for this calendar. Fails until a remote id is assigned.
    pub fn target(&self) -> CalendarResult<CalendarTarget> {
        let remote_id = self.remote_id.as_deref().ok_or_else(|| {
            CalendarError::Config(format!(
                "Calendar '{}' has no remote_id yet; run `hammers calendars --ensure`",
                self.title()
            ))
        })?;

        let mut target = CalendarTarget::for_competition(self.kind, self.competition, remote_id)?;
        target.title = self.title();
        target.description = self.description();
        if let Some(busy) = self.busy {
            target.busy = busy;
        }
        if let Some(hours) = self.duration_hours {
            if hours <= 0 {
                return Err(CalendarError::Config(format!(
                    "Calendar '{}' has a non-positive duration_hours",
                    target.title
                )));
            }
            target.duration = Duration::try_hours(hours).ok_or_else(|| {
                CalendarError::Config(format!(
                    "Calendar '{}' has an out-of-range duration_hours",
                    target.title
                ))
            })?;
        }

        Ok(target)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HammersConfig {
    #[serde(default = "default_club_name")]
    pub club_name: String,

    /// IANA timezone name events are published in.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_calendar_location")]
    pub calendar_location: String,

    #[serde(default = "default_games_path")]
    pub games_path: PathBuf,

    #[serde(default = "default_calendars")]
    pub calendars: Vec<CalendarConfig>,
}

impl Default for HammersConfig {
    fn default() -> Self {
        HammersConfig {
            club_name: default_club_name(),
            timezone: default_timezone(),
            calendar_location: default_calendar_location(),
            games_path: default_games_path(),
            calendars: default_calendars(),
        }
    }
}

impl HammersConfig {
    pub fn config_dir() -> CalendarResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalendarError::Config("Could not determine config directory".into()))?
            .join("hammers");

        Ok(config_dir)
    }

    pub fn config_path() -> CalendarResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> CalendarResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Read the file at `path` if it exists, then apply `HAMMERS_*` overrides.
    pub fn load_from(path: &Path) -> CalendarResult<Self> {
        let config: HammersConfig = Config::builder()
            .add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix("HAMMERS"))
            .build()
            .map_err(|e| CalendarError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalendarError::Config(e.to_string()))?;

        Ok(config)
    }

    pub fn save(&self) -> CalendarResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> CalendarResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CalendarError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalendarError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, content)
            .map_err(|e| CalendarError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn tz(&self) -> CalendarResult<Tz> {
        self.timezone.parse::<Tz>().map_err(|e| {
            CalendarError::Config(format!("Unknown timezone '{}': {e}", self.timezone))
        })
    }

    pub fn renderer(&self) -> CalendarResult<EventRenderer> {
        Ok(EventRenderer::new(&self.club_name, self.tz()?))
    }

    /// Sync targets in configured order.
    pub fn targets(&self) -> CalendarResult<Vec<CalendarTarget>> {
        self.calendars.iter().map(CalendarConfig::target).collect()
    }

    pub fn games_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.games_path.to_string_lossy()).into_owned();
        PathBuf::from(expanded)
    }
}
