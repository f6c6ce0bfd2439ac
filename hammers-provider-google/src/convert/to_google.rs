use std::collections::BTreeMap;

use chrono::{DateTime, SubsecRound, Utc};
use hammers_core::constants::GAME_ID_PROPERTY;
use hammers_core::remote::{EventStatus, RemoteCalendarInfo, RemoteEvent, Transparency};

use crate::convert::ToGoogle;
use crate::types::{EventDateTime, ExtendedProperties, GoogleCalendar, GoogleEvent};

impl ToGoogle<GoogleEvent> for RemoteEvent {
    fn to_google(&self) -> GoogleEvent {
        let status = match self.status {
            EventStatus::Confirmed => "confirmed",
            EventStatus::Tentative => "tentative",
            EventStatus::Cancelled => "cancelled",
        };

        let transparency = match self.transparency {
            Transparency::Opaque => "opaque",
            Transparency::Transparent => "transparent",
        };

        let extended_properties = self.game_id.as_ref().map(|game_id| ExtendedProperties {
            shared: BTreeMap::from([(GAME_ID_PROPERTY.to_string(), game_id.clone())]),
            private: BTreeMap::new(),
        });

        GoogleEvent {
            id: self.id.clone(),
            status: Some(status.to_string()),
            summary: Some(self.summary.clone()),
            description: self.description.clone(),
            start: self.start.map(|start| event_time(start, &self.time_zone)),
            end: self.end.map(|end| event_time(end, &self.time_zone)),
            transparency: Some(transparency.to_string()),
            extended_properties,
        }
    }
}

/// The API keeps whole seconds only.
fn event_time(at: DateTime<Utc>, time_zone: &Option<String>) -> EventDateTime {
    EventDateTime {
        date_time: Some(at.trunc_subsecs(0)),
        date: None,
        time_zone: time_zone.clone(),
    }
}

impl ToGoogle<GoogleCalendar> for RemoteCalendarInfo {
    fn to_google(&self) -> GoogleCalendar {
        GoogleCalendar {
            id: self.id.clone(),
            summary: self.summary.clone(),
            description: self.description.clone(),
            time_zone: self.time_zone.clone(),
            location: self.location.clone(),
        }
    }
}
