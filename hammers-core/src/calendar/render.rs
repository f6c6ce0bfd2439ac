//! How a game looks as a calendar event.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::calendar::{CalendarTarget, Interval};
use crate::game::{Game, GameId, Location};
use crate::remote::{EventStatus, RemoteEvent, Transparency};

/// Renders games into event content for one club and timezone.
#[derive(Debug, Clone)]
pub struct EventRenderer {
    club_name: String,
    timezone: Tz,
}

impl EventRenderer {
    pub fn new(club_name: &str, timezone: Tz) -> Self {
        EventRenderer {
            club_name: club_name.to_string(),
            timezone,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// "Home vs. Away (Competition)", with the TV channel in brackets if known.
    pub fn title(&self, game: &Game) -> String {
        let (home, away) = match game.location {
            Location::Home => (self.club_name.as_str(), game.opponents.as_str()),
            Location::Away => (game.opponents.as_str(), self.club_name.as_str()),
        };

        let mut title = format!("{} vs. {} ({})", home, away, game.competition.name());
        if let Some(channel) = &game.tv_channel {
            title.push_str(&format!(" [{channel}]"));
        }
        title
    }

    /// Result, attendance and match report, skipping whatever is unknown.
    pub fn description(&self, game: &Game) -> String {
        let mut parts = Vec::new();

        if let Some(result) = &game.result {
            parts.push(result.clone());
        }
        if let Some(attendance) = game.attendance {
            parts.push(format!("(Attendance: {})", group_thousands(attendance)));
        }
        if let Some(report) = &game.match_report {
            parts.push(report.clone());
        }

        parts.join(" ")
    }

    pub fn render(&self, game: &Game, target: &CalendarTarget, interval: Interval) -> EventContent {
        EventContent {
            summary: self.title(game),
            description: self.description(game),
            start: interval.start,
            end: interval.end,
            time_zone: self.timezone.name().to_string(),
            transparency: Transparency::from_busy(target.busy),
        }
    }
}

/// The fields of an event the engine owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContent {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub time_zone: String,
    pub transparency: Transparency,
}

impl EventContent {
    /// Names of the owned fields that differ from `event`.
    ///
    /// Times are compared to the whole second, the precision the calendar
    /// service keeps. A missing description equals an empty one.
    pub fn changed_fields(&self, event: &RemoteEvent) -> Vec<&'static str> {
        let mut changed = Vec::new();

        if self.summary != event.summary {
            changed.push("summary");
        }
        if !same_second(event.start, self.start) {
            changed.push("start");
        }
        if !same_second(event.end, self.end) {
            changed.push("end");
        }
        if self.description != event.description.as_deref().unwrap_or_default() {
            changed.push("description");
        }
        if self.transparency != event.transparency {
            changed.push("transparency");
        }

        changed
    }

    pub fn apply_to(&self, event: &mut RemoteEvent) {
        event.summary = self.summary.clone();
        event.description = non_empty(&self.description);
        event.start = Some(self.start);
        event.end = Some(self.end);
        event.time_zone = Some(self.time_zone.clone());
        event.transparency = self.transparency;
    }

    /// A new event tagged with the game it was published for.
    pub fn to_new_event(&self, game_id: GameId) -> RemoteEvent {
        let mut event = RemoteEvent {
            id: String::new(),
            summary: String::new(),
            description: None,
            start: None,
            end: None,
            time_zone: None,
            transparency: Transparency::Opaque,
            status: EventStatus::Confirmed,
            game_id: Some(game_id.to_string()),
        };
        self.apply_to(&mut event);
        event
    }
}

fn same_second(remote: Option<DateTime<Utc>>, local: DateTime<Utc>) -> bool {
    remote.is_some_and(|remote| remote.timestamp() == local.timestamp())
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn group_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarKind;
    use crate::testing::game;
    use chrono::Duration;

    fn renderer() -> EventRenderer {
        EventRenderer::new("West Ham", chrono_tz::Europe::London)
    }

    #[test]
    fn test_title_puts_club_first_at_home() {
        let mut g = game(1, "Arsenal");
        assert_eq!(renderer().title(&g), "West Ham vs. Arsenal (Premiership)");

        g.location = Location::Away;
        g.tv_channel = Some("Sky Sports 1".to_string());
        assert_eq!(
            renderer().title(&g),
            "Arsenal vs. West Ham (Premiership) [Sky Sports 1]"
        );
    }

    #[test]
    fn test_description_skips_missing_fields() {
        let mut g = game(1, "Arsenal");
        assert_eq!(renderer().description(&g), "");

        g.attendance = Some(34_977);
        assert_eq!(renderer().description(&g), "(Attendance: 34,977)");

        g.result = Some("W 2-1".to_string());
        g.match_report = Some("http://example.com/report".to_string());
        assert_eq!(
            renderer().description(&g),
            "W 2-1 (Attendance: 34,977) http://example.com/report"
        );
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_rendered_event_has_no_changes_against_itself() {
        let g = game(1, "Arsenal");
        let target = CalendarTarget::for_kind(CalendarKind::Attended, "a").unwrap();
        let content = renderer().render(&g, &target, target.interval_for(&g).unwrap());

        let event = content.to_new_event(g.id);

        assert!(content.changed_fields(&event).is_empty());
        assert_eq!(event.game_id.as_deref(), Some("1"));
        assert_eq!(event.transparency, Transparency::Opaque);
        assert_eq!(event.time_zone.as_deref(), Some("Europe/London"));
        assert_eq!(event.description, None);
    }

    #[test]
    fn test_sub_second_differences_are_not_changes() {
        let g = game(1, "Arsenal");
        let target = CalendarTarget::for_kind(CalendarKind::All, "all").unwrap();
        let content = renderer().render(&g, &target, target.interval_for(&g).unwrap());

        let mut event = content.to_new_event(g.id);
        event.start = Some(g.kickoff + Duration::milliseconds(400));

        assert!(content.changed_fields(&event).is_empty());

        event.start = Some(g.kickoff + Duration::seconds(1));
        assert_eq!(content.changed_fields(&event), vec!["start"]);
    }

    #[test]
    fn test_each_field_is_compared_independently() {
        let g = game(1, "Arsenal");
        let target = CalendarTarget::for_kind(CalendarKind::All, "all").unwrap();
        let content = renderer().render(&g, &target, target.interval_for(&g).unwrap());

        let mut event = content.to_new_event(g.id);
        event.summary = "Something else".to_string();
        event.description = Some("stale".to_string());
        event.transparency = Transparency::Opaque;
        event.end = None;

        assert_eq!(
            content.changed_fields(&event),
            vec!["summary", "end", "description", "transparency"]
        );
    }
}
