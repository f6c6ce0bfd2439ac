//! Core of the hammers calendar engine.
//!
//! This crate keeps a set of remote calendars in step with a snapshot of
//! football games:
//! - `game` holds the domain records and the snapshot they are read from
//! - `calendar` defines which games belong in which calendar, and how they look
//! - `remote` is the boundary to the calendar service, including the
//!   authentication-aware wrapper and the event locator
//! - `sync` reconciles calendars, moves games between them and records a change log

pub mod calendar;
pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod remote;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

pub use config::HammersConfig;
pub use error::{CalendarError, CalendarResult};
pub use game::{Competition, Game, GameId, GameKey, GameSnapshot, Location, TicketKind};
pub use sync::{ChangeLog, ChangeLogEntry, SyncEngine};
