//! Football games as read from the upstream game store.

mod snapshot;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use snapshot::GameSnapshot;

/// Stable numeric identity of a game, stored on every remote event we publish.
pub type GameId = u32;

/// Competitions the club plays in. Declaration order is the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Competition {
    Premiership,
    LeagueCup,
    FaCup,
    Championship,
    PlayOffs,
}

impl Competition {
    pub fn name(&self) -> &'static str {
        match self {
            Competition::Premiership => "Premiership",
            Competition::LeagueCup => "League Cup",
            Competition::FaCup => "FA Cup",
            Competition::Championship => "Championship",
            Competition::PlayOffs => "Play-Offs",
        }
    }
}

impl fmt::Display for Competition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Home,
    Away,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Home => write!(f, "Home"),
            Location::Away => write!(f, "Away"),
        }
    }
}

/// The groups of supporters that get their own ticket sale date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketKind {
    Bondholders,
    PriorityPoint,
    SeasonTicket,
    Academy,
    GeneralSale,
}

/// When tickets go on sale for each group, if announced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bondholders: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_point: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_ticket: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academy: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_sale: Option<DateTime<Utc>>,
}

impl TicketDates {
    pub fn get(&self, kind: TicketKind) -> Option<DateTime<Utc>> {
        match kind {
            TicketKind::Bondholders => self.bondholders,
            TicketKind::PriorityPoint => self.priority_point,
            TicketKind::SeasonTicket => self.season_ticket,
            TicketKind::Academy => self.academy,
            TicketKind::GeneralSale => self.general_sale,
        }
    }
}

/// Natural key of a game: unique within a season.
///
/// Field order is the sort order: season, competition, opponents, location.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameKey {
    pub season: u16,
    pub competition: Competition,
    pub opponents: String,
    pub location: Location,
}

impl fmt::Display for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.season, self.competition, self.opponents, self.location
        )
    }
}

/// A single fixture with its result, attendance and ticket metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub season: u16,
    pub competition: Competition,
    pub location: Location,
    pub opponents: String,
    pub kickoff: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_report: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tv_channel: Option<String>,
    #[serde(default)]
    pub attended: bool,
    #[serde(default)]
    pub tickets: TicketDates,
}

impl Game {
    pub fn key(&self) -> GameKey {
        GameKey {
            season: self.season,
            competition: self.competition,
            opponents: self.opponents.clone(),
            location: self.location,
        }
    }

    pub fn is_televised(&self) -> bool {
        self.tv_channel.is_some()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, {})",
            self.opponents, self.location, self.competition, self.season
        )
    }
}
