//! Boundary to the remote calendar service.
//!
//! `RemoteCalendar` is implemented by each backend (see the Google provider
//! crate). Engine code never calls it directly: every call goes through
//! `AuthAwareCalendar`, which turns a 403 into `AuthenticationRequired`.

mod auth_aware;
mod error;
mod locate;
mod paginate;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::GameId;

pub use auth_aware::{AuthAwareCalendar, classify};
pub use error::RemoteError;
pub use locate::{EventLocator, LocatedEvent, SearchWindow};

/// Whether an event blocks time on the calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transparency {
    /// Busy. Also what an event without a transparency reads as.
    #[default]
    Opaque,
    /// Free.
    Transparent,
}

impl Transparency {
    pub fn from_busy(busy: bool) -> Self {
        if busy {
            Transparency::Opaque
        } else {
            Transparency::Transparent
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    #[default]
    Confirmed,
    Tentative,
    /// Deleted events linger in listings with this status.
    Cancelled,
}

/// One event in a remote calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEvent {
    /// Assigned by the service; ignored on insert.
    pub id: String,
    pub summary: String,
    pub description: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub time_zone: Option<String>,
    pub transparency: Transparency,
    pub status: EventStatus,
    /// Raw value of the game id property, if the event carries one.
    pub game_id: Option<String>,
}

impl RemoteEvent {
    pub fn is_cancelled(&self) -> bool {
        self.status == EventStatus::Cancelled
    }

    /// The game this event was published for, if it is live and one of ours.
    pub fn live_game_id(&self) -> Option<GameId> {
        if self.is_cancelled() {
            return None;
        }
        self.game_id.as_deref()?.trim().parse().ok()
    }
}

/// A remote calendar's own metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCalendarInfo {
    pub id: String,
    pub summary: String,
    pub description: Option<String>,
    pub time_zone: Option<String>,
    pub location: Option<String>,
}

/// Filters for listing events. `None` bounds are unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub time_min: Option<DateTime<Utc>>,
    pub time_max: Option<DateTime<Utc>>,
    pub show_deleted: bool,
    pub page_token: Option<String>,
}

impl EventQuery {
    pub fn between(time_min: DateTime<Utc>, time_max: DateTime<Utc>) -> Self {
        EventQuery {
            time_min: Some(time_min),
            time_max: Some(time_max),
            ..Default::default()
        }
    }

    pub fn with_deleted(mut self) -> Self {
        self.show_deleted = true;
        self
    }

    pub fn page(&self, page_token: Option<String>) -> Self {
        EventQuery {
            page_token,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventPage {
    pub items: Vec<RemoteEvent>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CalendarPage {
    pub items: Vec<RemoteCalendarInfo>,
    pub next_page_token: Option<String>,
}

/// The remote calendar service, one page or one resource per call.
#[allow(async_fn_in_trait)]
pub trait RemoteCalendar {
    async fn list_events(
        &self,
        calendar_id: &str,
        query: &EventQuery,
    ) -> Result<EventPage, RemoteError>;

    async fn get_event(&self, calendar_id: &str, event_id: &str)
    -> Result<RemoteEvent, RemoteError>;

    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &RemoteEvent,
    ) -> Result<RemoteEvent, RemoteError>;

    /// Overwrite the fields `event` carries. Properties it does not model
    /// (reminders, colour, attendees) are left as they are.
    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &RemoteEvent,
    ) -> Result<RemoteEvent, RemoteError>;

    /// Soft delete: the event stays listable with a cancelled status.
    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<(), RemoteError>;

    async fn move_event(
        &self,
        source_calendar_id: &str,
        event_id: &str,
        destination_calendar_id: &str,
    ) -> Result<RemoteEvent, RemoteError>;

    async fn list_calendars(&self, page_token: Option<&str>)
    -> Result<CalendarPage, RemoteError>;

    async fn get_calendar(&self, calendar_id: &str) -> Result<RemoteCalendarInfo, RemoteError>;

    async fn insert_calendar(
        &self,
        calendar: &RemoteCalendarInfo,
    ) -> Result<RemoteCalendarInfo, RemoteError>;

    async fn update_calendar(
        &self,
        calendar_id: &str,
        calendar: &RemoteCalendarInfo,
    ) -> Result<RemoteCalendarInfo, RemoteError>;
}
