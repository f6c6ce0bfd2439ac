//! Finding one published event without listing a whole calendar.

use std::fmt;

use chrono::{DateTime, Duration, Months, Utc};
use tracing::info;

use crate::error::CalendarResult;
use crate::game::GameId;
use crate::remote::{AuthAwareCalendar, EventQuery, RemoteCalendar};

/// A time window around the search anchor, narrowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SearchWindow {
    Hour,
    Day,
    Week,
    Month,
    Year,
    Unbounded,
}

impl SearchWindow {
    pub const ALL: [SearchWindow; 6] = [
        SearchWindow::Hour,
        SearchWindow::Day,
        SearchWindow::Week,
        SearchWindow::Month,
        SearchWindow::Year,
        SearchWindow::Unbounded,
    ];

    /// `[anchor - window, anchor + window]`, or `None` for no time filter.
    pub fn bounds(&self, anchor: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match self {
            SearchWindow::Hour => Some(around(anchor, Duration::hours(1))),
            SearchWindow::Day => Some(around(anchor, Duration::days(1))),
            SearchWindow::Week => Some(around(anchor, Duration::weeks(1))),
            SearchWindow::Month => Some(around_months(anchor, 1)),
            SearchWindow::Year => Some(around_months(anchor, 12)),
            SearchWindow::Unbounded => None,
        }
    }
}

impl fmt::Display for SearchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchWindow::Hour => "hour",
            SearchWindow::Day => "day",
            SearchWindow::Week => "week",
            SearchWindow::Month => "month",
            SearchWindow::Year => "year",
            SearchWindow::Unbounded => "unbounded",
        };
        write!(f, "{name}")
    }
}

fn around(anchor: DateTime<Utc>, span: Duration) -> (DateTime<Utc>, DateTime<Utc>) {
    let min = anchor.checked_sub_signed(span).unwrap_or(DateTime::<Utc>::MIN_UTC);
    let max = anchor.checked_add_signed(span).unwrap_or(DateTime::<Utc>::MAX_UTC);
    (min, max)
}

fn around_months(anchor: DateTime<Utc>, months: u32) -> (DateTime<Utc>, DateTime<Utc>) {
    let min = anchor
        .checked_sub_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let max = anchor
        .checked_add_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    (min, max)
}

/// Where an event was found and which window found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedEvent {
    pub event_id: String,
    pub window: SearchWindow,
}

/// Searches successively wider windows for the event published for a game.
pub struct EventLocator<'a, R> {
    api: &'a AuthAwareCalendar<R>,
}

impl<'a, R: RemoteCalendar> EventLocator<'a, R> {
    pub fn new(api: &'a AuthAwareCalendar<R>) -> Self {
        EventLocator { api }
    }

    /// Find the live event carrying `game_id`, searching outward from `anchor`.
    pub async fn find(
        &self,
        calendar_id: &str,
        game_id: GameId,
        anchor: DateTime<Utc>,
    ) -> CalendarResult<Option<LocatedEvent>> {
        for window in SearchWindow::ALL {
            info!(calendar = calendar_id, game_id, %window, "Searching for game");

            let query = match window.bounds(anchor) {
                Some((min, max)) => EventQuery::between(min, max),
                None => EventQuery::default(),
            };

            let events = self.api.list_all_events(calendar_id, &query).await?;
            if let Some(event) = events
                .into_iter()
                .find(|event| event.live_game_id() == Some(game_id))
            {
                return Ok(Some(LocatedEvent {
                    event_id: event.id,
                    window,
                }));
            }
        }

        Ok(None)
    }
}
