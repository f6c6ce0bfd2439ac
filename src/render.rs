//! Terminal rendering for hammers types.
//!
//! Extension traits and helpers that add colored output to hammers-core
//! types using owo_colors.

use hammers_core::calendar::EventRenderer;
use hammers_core::remote::RemoteCalendarInfo;
use hammers_core::sync::{Action, ChangeLog, ChangeLogEntry};
use hammers_core::Game;
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Action {
    fn render(&self) -> String {
        match self {
            Action::Added => "+".green().to_string(),
            Action::Updated => "~".yellow().to_string(),
            Action::Removed => "-".red().to_string(),
        }
    }
}

impl Render for ChangeLogEntry {
    fn render(&self) -> String {
        let text = self.change.to_string();
        let text = match self.action() {
            Action::Added => text.green().to_string(),
            Action::Updated => text.yellow().to_string(),
            Action::Removed => text.red().to_string(),
        };
        format!("{} {}", self.action().render(), text)
    }
}

impl Render for ChangeLog {
    fn render(&self) -> String {
        if self.is_empty() {
            return "All calendars up to date".dimmed().to_string();
        }

        let mut lines = Vec::new();
        let mut calendar: Option<&str> = None;

        // Entries arrive sorted by calendar title.
        for entry in self {
            if calendar != Some(entry.calendar.as_str()) {
                if calendar.is_some() {
                    lines.push(String::new());
                }
                lines.push(format!("📅 {}", entry.calendar));
                calendar = Some(entry.calendar.as_str());
            }
            lines.push(format!("   {}", entry.render()));
        }

        let counts = self.counts();
        lines.push(String::new());
        lines.push(format!(
            "Synced: {} added, {} updated, {} removed",
            counts.added, counts.updated, counts.removed
        ));

        lines.join("\n")
    }
}

pub fn render_calendar(calendar: &RemoteCalendarInfo, configured: bool) -> String {
    let marker = if configured {
        "✓".green().to_string()
    } else {
        " ".to_string()
    };
    format!("{} 📅 {} {}", marker, calendar.summary, calendar.id.dimmed())
}

pub fn render_game(game: &Game, renderer: &EventRenderer) -> String {
    let kickoff = game
        .kickoff
        .with_timezone(&renderer.timezone())
        .format("%a %e %b %Y %H:%M");
    let title = if game.attended {
        renderer.title(game).green().to_string()
    } else {
        renderer.title(game)
    };

    let mut line = format!("{:>5} {} {}", game.id.dimmed(), kickoff, title);
    let description = renderer.description(game);
    if !description.is_empty() {
        line.push_str(&format!(" {}", description.dimmed()));
    }
    line
}
