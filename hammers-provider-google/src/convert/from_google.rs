use anyhow::{Result, bail};
use hammers_core::constants::GAME_ID_PROPERTY;
use hammers_core::remote::{EventStatus, RemoteCalendarInfo, RemoteEvent, Transparency};

use crate::convert::FromGoogle;
use crate::types::{GoogleCalendar, GoogleEvent};

impl FromGoogle<GoogleEvent> for RemoteEvent {
    fn from_google(event: GoogleEvent) -> Result<Self> {
        if event.id.is_empty() {
            bail!("Event has no id");
        }

        let status = match event.status.as_deref() {
            Some("tentative") => EventStatus::Tentative,
            Some("cancelled") => EventStatus::Cancelled,
            _ => EventStatus::Confirmed,
        };

        let transparency = match event.transparency.as_deref() {
            Some("transparent") => Transparency::Transparent,
            _ => Transparency::Opaque,
        };

        let game_id = event
            .extended_properties
            .as_ref()
            .and_then(|props| props.shared.get(GAME_ID_PROPERTY))
            .cloned();

        let time_zone = event
            .start
            .as_ref()
            .and_then(|start| start.time_zone.clone());

        Ok(RemoteEvent {
            id: event.id,
            summary: event.summary.unwrap_or_default(),
            description: event.description,
            // All-day events have no instant; we never publish those.
            start: event.start.as_ref().and_then(|start| start.date_time),
            end: event.end.as_ref().and_then(|end| end.date_time),
            time_zone,
            transparency,
            status,
            game_id,
        })
    }
}

impl FromGoogle<GoogleCalendar> for RemoteCalendarInfo {
    fn from_google(calendar: GoogleCalendar) -> Result<Self> {
        if calendar.id.is_empty() {
            bail!("Calendar has no id");
        }

        Ok(RemoteCalendarInfo {
            id: calendar.id,
            summary: calendar.summary,
            description: calendar.description,
            time_zone: calendar.time_zone,
            location: calendar.location,
        })
    }
}
