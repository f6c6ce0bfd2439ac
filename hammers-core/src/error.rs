//! Error types for the hammers calendar engine.

use thiserror::Error;

use crate::game::GameId;
use crate::remote::RemoteError;

/// Errors that can occur while reconciling or moving games.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Remote calendar service error: {0}")]
    RemoteService(#[source] RemoteError),

    #[error("Authentication required for {request}")]
    AuthenticationRequired {
        request: String,
        #[source]
        source: RemoteError,
    },

    #[error("Game {game_id} not found in calendar '{calendar}'")]
    GameNotFoundInSource { game_id: GameId, calendar: String },

    #[error("Calendar '{calendar}' selected game {game_id} but could not give it a time")]
    MalformedCalendarPolicy { calendar: String, game_id: GameId },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No calendar configured for '{0}'")]
    UnknownCalendar(String),

    #[error("Game snapshot error: {0}")]
    GameSnapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CalendarError {
    /// Whether the caller should re-authorise rather than retry.
    pub fn is_authentication_required(&self) -> bool {
        matches!(self, CalendarError::AuthenticationRequired { .. })
    }
}

/// Result type alias for calendar operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
