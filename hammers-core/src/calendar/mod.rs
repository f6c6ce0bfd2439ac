//! Logical calendars and the policies deciding which games they show.

mod render;

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{GAME_DURATION_HOURS, TICKET_DURATION_HOURS};
use crate::error::{CalendarError, CalendarResult};
use crate::game::{Competition, Game, Location, TicketKind};

pub use render::{EventContent, EventRenderer};

/// Every kind of calendar the engine can publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarKind {
    Attended,
    Unattended,
    Home,
    Away,
    All,
    Televised,
    /// One calendar per competition; the competition is named alongside.
    Competition,
    TicketsGeneralSale,
    TicketsAcademy,
    TicketsSeason,
    TicketsPriority,
    TicketsBondholders,
}

impl CalendarKind {
    /// The calendars published when nothing else is configured.
    pub const DEFAULTS: [CalendarKind; 11] = [
        CalendarKind::Attended,
        CalendarKind::Unattended,
        CalendarKind::Home,
        CalendarKind::Away,
        CalendarKind::All,
        CalendarKind::Televised,
        CalendarKind::TicketsGeneralSale,
        CalendarKind::TicketsAcademy,
        CalendarKind::TicketsSeason,
        CalendarKind::TicketsPriority,
        CalendarKind::TicketsBondholders,
    ];

    pub fn default_title(&self, competition: Option<Competition>) -> String {
        match self {
            CalendarKind::Attended => "Attended games".to_string(),
            CalendarKind::Unattended => "Unattended games".to_string(),
            CalendarKind::Home => "Home games".to_string(),
            CalendarKind::Away => "Away games".to_string(),
            CalendarKind::All => "All games".to_string(),
            CalendarKind::Televised => "Televised games".to_string(),
            CalendarKind::Competition => match competition {
                Some(c) => format!("{} games", c.name()),
                None => "Competition games".to_string(),
            },
            CalendarKind::TicketsGeneralSale => "General sale".to_string(),
            CalendarKind::TicketsAcademy => "Academy members".to_string(),
            CalendarKind::TicketsSeason => "Season ticket holders".to_string(),
            CalendarKind::TicketsPriority => "Priority point holders".to_string(),
            CalendarKind::TicketsBondholders => "Bondholders".to_string(),
        }
    }

    /// Only games you are going to should block time.
    pub fn default_busy(&self) -> bool {
        matches!(self, CalendarKind::Attended)
    }

    pub fn ticket_kind(&self) -> Option<TicketKind> {
        match self {
            CalendarKind::TicketsGeneralSale => Some(TicketKind::GeneralSale),
            CalendarKind::TicketsAcademy => Some(TicketKind::Academy),
            CalendarKind::TicketsSeason => Some(TicketKind::SeasonTicket),
            CalendarKind::TicketsPriority => Some(TicketKind::PriorityPoint),
            CalendarKind::TicketsBondholders => Some(TicketKind::Bondholders),
            _ => None,
        }
    }

    pub fn default_duration(&self) -> Duration {
        if self.ticket_kind().is_some() {
            Duration::hours(TICKET_DURATION_HOURS)
        } else {
            Duration::hours(GAME_DURATION_HOURS)
        }
    }

    pub fn membership(&self, competition: Option<Competition>) -> CalendarResult<Membership> {
        let membership = match self {
            CalendarKind::Attended => Membership::Attended(true),
            CalendarKind::Unattended => Membership::Attended(false),
            CalendarKind::Home => Membership::Location(Location::Home),
            CalendarKind::Away => Membership::Location(Location::Away),
            CalendarKind::All => Membership::Always,
            CalendarKind::Televised => Membership::Televised,
            CalendarKind::Competition => {
                let competition = competition.ok_or_else(|| {
                    CalendarError::Config(
                        "a competition calendar needs `competition` to be set".to_string(),
                    )
                })?;
                Membership::Competition(competition)
            }
            CalendarKind::TicketsGeneralSale => Membership::TicketsOnSale(TicketKind::GeneralSale),
            CalendarKind::TicketsAcademy => Membership::TicketsOnSale(TicketKind::Academy),
            CalendarKind::TicketsSeason => Membership::TicketsOnSale(TicketKind::SeasonTicket),
            CalendarKind::TicketsPriority => Membership::TicketsOnSale(TicketKind::PriorityPoint),
            CalendarKind::TicketsBondholders => Membership::TicketsOnSale(TicketKind::Bondholders),
        };

        Ok(membership)
    }

    pub fn interval_source(&self) -> IntervalSource {
        match self.ticket_kind() {
            Some(ticket) => IntervalSource::TicketSale(ticket),
            None => IntervalSource::Kickoff,
        }
    }
}

impl fmt::Display for CalendarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CalendarKind::Attended => "attended",
            CalendarKind::Unattended => "unattended",
            CalendarKind::Home => "home",
            CalendarKind::Away => "away",
            CalendarKind::All => "all",
            CalendarKind::Televised => "televised",
            CalendarKind::Competition => "competition",
            CalendarKind::TicketsGeneralSale => "tickets_general_sale",
            CalendarKind::TicketsAcademy => "tickets_academy",
            CalendarKind::TicketsSeason => "tickets_season",
            CalendarKind::TicketsPriority => "tickets_priority",
            CalendarKind::TicketsBondholders => "tickets_bondholders",
        };
        write!(f, "{name}")
    }
}

/// Which games belong in a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Always,
    Attended(bool),
    Location(Location),
    Televised,
    Competition(Competition),
    TicketsOnSale(TicketKind),
}

impl Membership {
    pub fn contains(&self, game: &Game) -> bool {
        match self {
            Membership::Always => true,
            Membership::Attended(attended) => game.attended == *attended,
            Membership::Location(location) => game.location == *location,
            Membership::Televised => game.is_televised(),
            Membership::Competition(competition) => game.competition == *competition,
            Membership::TicketsOnSale(kind) => game.tickets.get(*kind).is_some(),
        }
    }
}

/// Which instant of a game a calendar shows it at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalSource {
    Kickoff,
    TicketSale(TicketKind),
}

impl IntervalSource {
    pub fn start_for(&self, game: &Game) -> Option<DateTime<Utc>> {
        match self {
            IntervalSource::Kickoff => Some(game.kickoff),
            IntervalSource::TicketSale(kind) => game.tickets.get(*kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A logical calendar bound to its remote calendar.
#[derive(Debug, Clone)]
pub struct CalendarTarget {
    pub kind: CalendarKind,
    pub remote_id: String,
    pub title: String,
    pub description: String,
    pub busy: bool,
    pub duration: Duration,
    pub membership: Membership,
    pub interval: IntervalSource,
}

impl CalendarTarget {
    /// A target with the default policy for `kind`.
    pub fn for_kind(kind: CalendarKind, remote_id: &str) -> CalendarResult<Self> {
        Self::for_competition(kind, None, remote_id)
    }

    pub fn for_competition(
        kind: CalendarKind,
        competition: Option<Competition>,
        remote_id: &str,
    ) -> CalendarResult<Self> {
        let title = kind.default_title(competition);
        Ok(CalendarTarget {
            kind,
            remote_id: remote_id.to_string(),
            description: title.clone(),
            title,
            busy: kind.default_busy(),
            duration: kind.default_duration(),
            membership: kind.membership(competition)?,
            interval: kind.interval_source(),
        })
    }

    pub fn contains(&self, game: &Game) -> bool {
        self.membership.contains(game)
    }

    /// The interval this calendar displays for `game`.
    pub fn interval_for(&self, game: &Game) -> CalendarResult<Interval> {
        let malformed = || CalendarError::MalformedCalendarPolicy {
            calendar: self.title.clone(),
            game_id: game.id,
        };
        let start = self.interval.start_for(game).ok_or_else(malformed)?;
        let end = start.checked_add_signed(self.duration).ok_or_else(malformed)?;

        Ok(Interval { start, end })
    }
}
