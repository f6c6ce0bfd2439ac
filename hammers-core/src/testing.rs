//! Test fixtures: sample games and an in-memory remote calendar.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::game::{Competition, Game, GameId, Location, TicketDates};
use crate::remote::{
    CalendarPage, EventPage, EventQuery, EventStatus, RemoteCalendar, RemoteCalendarInfo,
    RemoteError, RemoteEvent, Transparency,
};

pub fn kickoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2012, 8, 18, 14, 0, 0).unwrap()
}

/// A home Premiership game in 2012. Distinct opponents give distinct keys.
pub fn game(id: GameId, opponents: &str) -> Game {
    Game {
        id,
        season: 2012,
        competition: Competition::Premiership,
        location: Location::Home,
        opponents: opponents.to_string(),
        kickoff: kickoff(),
        result: None,
        attendance: None,
        match_report: None,
        tv_channel: None,
        attended: false,
        tickets: TicketDates::default(),
    }
}

/// An event tagged with `game_id`, starting at `at`.
pub fn event_at(game_id: GameId, at: DateTime<Utc>) -> RemoteEvent {
    RemoteEvent {
        id: String::new(),
        summary: format!("Game {game_id}"),
        description: None,
        start: Some(at),
        end: Some(at + Duration::hours(2)),
        time_zone: Some("Europe/London".to_string()),
        transparency: Transparency::Transparent,
        status: EventStatus::Confirmed,
        game_id: Some(game_id.to_string()),
    }
}

pub fn event_for(game_id: GameId) -> RemoteEvent {
    event_at(game_id, kickoff())
}

const DEFAULT_PAGE_SIZE: usize = 250;

#[derive(Debug)]
struct StoredCalendar {
    info: RemoteCalendarInfo,
    events: Vec<RemoteEvent>,
}

#[derive(Debug, Default)]
struct State {
    calendars: Vec<StoredCalendar>,
    next_id: usize,
    calls: HashMap<&'static str, usize>,
    failures: Vec<(Option<&'static str>, u16)>,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn calendar(
        &mut self,
        method: &str,
        calendar_id: &str,
    ) -> Result<&mut StoredCalendar, RemoteError> {
        self.calendars
            .iter_mut()
            .find(|c| c.info.id == calendar_id)
            .ok_or_else(|| RemoteError::http(404, method, &calendar_url(calendar_id), "Not Found"))
    }

    fn event(
        &mut self,
        method: &str,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<&mut RemoteEvent, RemoteError> {
        self.calendar(method, calendar_id)?
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| {
                RemoteError::http(404, method, &event_url(calendar_id, event_id), "Not Found")
            })
    }
}

/// A remote calendar held in memory.
///
/// Deleted events stay behind as cancelled, list calls are paginated and
/// filtered by time window the way the real service filters them, and every
/// call is counted by operation name.
#[derive(Debug)]
pub struct MemoryCalendar {
    state: Mutex<State>,
    page_size: usize,
}

impl MemoryCalendar {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        MemoryCalendar {
            state: Mutex::new(State::default()),
            page_size,
        }
    }

    pub fn add_calendar(&self, id: &str) {
        self.state.lock().unwrap().calendars.push(StoredCalendar {
            info: RemoteCalendarInfo {
                id: id.to_string(),
                summary: id.to_string(),
                ..Default::default()
            },
            events: Vec::new(),
        });
    }

    /// Store an event without counting a call. Returns its new id.
    pub fn seed_event(&self, calendar_id: &str, mut event: RemoteEvent) -> String {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id("evt");
        event.id = id.clone();
        state
            .calendar("SEED", calendar_id)
            .unwrap()
            .events
            .push(event);
        id
    }

    /// Every stored event, cancelled ones included.
    pub fn events(&self, calendar_id: &str) -> Vec<RemoteEvent> {
        let mut state = self.state.lock().unwrap();
        state.calendar("INSPECT", calendar_id).unwrap().events.clone()
    }

    pub fn live_events(&self, calendar_id: &str) -> Vec<RemoteEvent> {
        self.events(calendar_id)
            .into_iter()
            .filter(|e| !e.is_cancelled())
            .collect()
    }

    /// Game ids of live events, sorted.
    pub fn live_game_ids(&self, calendar_id: &str) -> Vec<GameId> {
        let mut ids: Vec<_> = self
            .live_events(calendar_id)
            .iter()
            .filter_map(|e| e.live_game_id())
            .collect();
        ids.sort();
        ids
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    /// Calls that changed remote state.
    pub fn writes(&self) -> usize {
        ["insert_event", "update_event", "delete_event", "move_event"]
            .iter()
            .map(|op| self.calls(op))
            .sum()
    }

    pub fn reset_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Make the next call, whatever it is, fail with `status`.
    pub fn fail_next(&self, status: u16) {
        self.state.lock().unwrap().failures.push((None, status));
    }

    /// Make the next call to `operation` fail with `status`.
    pub fn fail_next_call_to(&self, operation: &'static str, status: u16) {
        self.state
            .lock()
            .unwrap()
            .failures
            .push((Some(operation), status));
    }

    fn begin(&self, operation: &'static str, method: &str, url: &str) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(operation).or_default() += 1;

        let pending = state
            .failures
            .iter()
            .position(|(op, _)| op.is_none_or(|op| op == operation));
        match pending {
            Some(index) => {
                let (_, status) = state.failures.remove(index);
                Err(RemoteError::http(status, method, url, "Injected failure"))
            }
            None => Ok(()),
        }
    }
}

fn calendar_url(calendar_id: &str) -> String {
    format!("memory://calendars/{calendar_id}")
}

fn events_url(calendar_id: &str) -> String {
    format!("memory://calendars/{calendar_id}/events")
}

fn event_url(calendar_id: &str, event_id: &str) -> String {
    format!("memory://calendars/{calendar_id}/events/{event_id}")
}

fn page<T: Clone>(items: &[T], token: Option<&str>, size: usize) -> (Vec<T>, Option<String>) {
    let offset: usize = token.and_then(|t| t.parse().ok()).unwrap_or(0);
    let end = (offset + size).min(items.len());
    let next = (end < items.len()).then(|| end.to_string());
    (items[offset.min(end)..end].to_vec(), next)
}

/// Overlap test used by the service: ends after `time_min`, starts before `time_max`.
fn in_window(event: &RemoteEvent, query: &EventQuery) -> bool {
    if query.time_min.is_none() && query.time_max.is_none() {
        return true;
    }
    let Some(start) = event.start else {
        return false;
    };
    let end = event.end.unwrap_or(start);

    query.time_min.is_none_or(|min| end > min) && query.time_max.is_none_or(|max| start < max)
}

impl RemoteCalendar for MemoryCalendar {
    async fn list_events(
        &self,
        calendar_id: &str,
        query: &EventQuery,
    ) -> Result<EventPage, RemoteError> {
        let url = events_url(calendar_id);
        self.begin("list_events", "GET", &url)?;

        let mut state = self.state.lock().unwrap();
        let matching: Vec<RemoteEvent> = state
            .calendar("GET", calendar_id)?
            .events
            .iter()
            .filter(|e| query.show_deleted || !e.is_cancelled())
            .filter(|e| in_window(e, query))
            .cloned()
            .collect();

        let (items, next_page_token) = page(&matching, query.page_token.as_deref(), self.page_size);
        Ok(EventPage {
            items,
            next_page_token,
        })
    }

    async fn get_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<RemoteEvent, RemoteError> {
        self.begin("get_event", "GET", &event_url(calendar_id, event_id))?;

        let mut state = self.state.lock().unwrap();
        Ok(state.event("GET", calendar_id, event_id)?.clone())
    }

    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &RemoteEvent,
    ) -> Result<RemoteEvent, RemoteError> {
        self.begin("insert_event", "POST", &events_url(calendar_id))?;

        let mut state = self.state.lock().unwrap();
        let id = state.next_id("evt");
        let mut stored = event.clone();
        stored.id = id;
        stored.status = EventStatus::Confirmed;
        state.calendar("POST", calendar_id)?.events.push(stored.clone());
        Ok(stored)
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &RemoteEvent,
    ) -> Result<RemoteEvent, RemoteError> {
        self.begin("update_event", "PATCH", &event_url(calendar_id, event_id))?;

        let mut state = self.state.lock().unwrap();
        let stored = state.event("PATCH", calendar_id, event_id)?;
        *stored = RemoteEvent {
            id: event_id.to_string(),
            ..event.clone()
        };
        Ok(stored.clone())
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<(), RemoteError> {
        let url = event_url(calendar_id, event_id);
        self.begin("delete_event", "DELETE", &url)?;

        let mut state = self.state.lock().unwrap();
        let stored = state.event("DELETE", calendar_id, event_id)?;
        if stored.is_cancelled() {
            return Err(RemoteError::http(410, "DELETE", &url, "Resource has been deleted"));
        }
        stored.status = EventStatus::Cancelled;
        Ok(())
    }

    async fn move_event(
        &self,
        source_calendar_id: &str,
        event_id: &str,
        destination_calendar_id: &str,
    ) -> Result<RemoteEvent, RemoteError> {
        let url = format!("{}/move", event_url(source_calendar_id, event_id));
        self.begin("move_event", "POST", &url)?;

        let mut state = self.state.lock().unwrap();
        state.calendar("POST", destination_calendar_id)?;

        let source = state.calendar("POST", source_calendar_id)?;
        let index = source
            .events
            .iter()
            .position(|e| e.id == event_id)
            .ok_or_else(|| RemoteError::http(404, "POST", &url, "Not Found"))?;
        let event = source.events.remove(index);

        state
            .calendar("POST", destination_calendar_id)?
            .events
            .push(event.clone());
        Ok(event)
    }

    async fn list_calendars(&self, page_token: Option<&str>) -> Result<CalendarPage, RemoteError> {
        self.begin("list_calendars", "GET", "memory://calendarList")?;

        let state = self.state.lock().unwrap();
        let infos: Vec<RemoteCalendarInfo> =
            state.calendars.iter().map(|c| c.info.clone()).collect();

        let (items, next_page_token) = page(&infos, page_token, self.page_size);
        Ok(CalendarPage {
            items,
            next_page_token,
        })
    }

    async fn get_calendar(&self, calendar_id: &str) -> Result<RemoteCalendarInfo, RemoteError> {
        self.begin("get_calendar", "GET", &calendar_url(calendar_id))?;

        let mut state = self.state.lock().unwrap();
        Ok(state.calendar("GET", calendar_id)?.info.clone())
    }

    async fn insert_calendar(
        &self,
        calendar: &RemoteCalendarInfo,
    ) -> Result<RemoteCalendarInfo, RemoteError> {
        self.begin("insert_calendar", "POST", "memory://calendars")?;

        let mut state = self.state.lock().unwrap();
        let info = RemoteCalendarInfo {
            id: state.next_id("cal"),
            ..calendar.clone()
        };
        state.calendars.push(StoredCalendar {
            info: info.clone(),
            events: Vec::new(),
        });
        Ok(info)
    }

    async fn update_calendar(
        &self,
        calendar_id: &str,
        calendar: &RemoteCalendarInfo,
    ) -> Result<RemoteCalendarInfo, RemoteError> {
        self.begin("update_calendar", "PUT", &calendar_url(calendar_id))?;

        let mut state = self.state.lock().unwrap();
        let stored = state.calendar("PUT", calendar_id)?;
        stored.info = RemoteCalendarInfo {
            id: calendar_id.to_string(),
            ..calendar.clone()
        };
        Ok(stored.info.clone())
    }
}
