//! The ordered record of every decision a sync pass makes.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use crate::game::{Game, GameId, GameKey};

/// What happened to one game in one calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Removed,
    Updated,
    Added,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Removed => write!(f, "Removed"),
            Action::Updated => write!(f, "Updated"),
            Action::Added => write!(f, "Added"),
        }
    }
}

/// A change and the game it applies to.
///
/// Removals only know the game id for sure; the game itself may already be
/// gone from the snapshot.
#[derive(Debug, Clone)]
pub enum Change {
    Added(Game),
    Updated(Game),
    Removed { game_id: GameId, game: Option<Game> },
}

impl Change {
    pub fn action(&self) -> Action {
        match self {
            Change::Added(_) => Action::Added,
            Change::Updated(_) => Action::Updated,
            Change::Removed { .. } => Action::Removed,
        }
    }

    pub fn game(&self) -> Option<&Game> {
        match self {
            Change::Added(game) | Change::Updated(game) => Some(game),
            Change::Removed { game, .. } => game.as_ref(),
        }
    }

    pub fn game_id(&self) -> GameId {
        match self {
            Change::Added(game) | Change::Updated(game) => game.id,
            Change::Removed { game_id, .. } => *game_id,
        }
    }

    /// Natural key of the game, if known. Unknown games sort first.
    pub fn key(&self) -> Option<GameKey> {
        self.game().map(Game::key)
    }
}

impl Ord for Change {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key()
            .cmp(&other.key())
            .then_with(|| self.action().cmp(&other.action()))
            .then_with(|| match (self, other) {
                (Change::Added(a), Change::Added(b)) | (Change::Updated(a), Change::Updated(b)) => {
                    a.id.cmp(&b.id)
                }
                (Change::Removed { game_id: a, .. }, Change::Removed { game_id: b, .. }) => {
                    a.cmp(b)
                }
                // Different actions were already ordered above.
                _ => Ordering::Equal,
            })
    }
}

impl PartialOrd for Change {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Change {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Change {}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.game() {
            Some(game) => write!(f, "{} {}", self.action(), game),
            None => write!(f, "{} [{}:unknown]", self.action(), self.game_id()),
        }
    }
}

/// One line of the change log, ordered by calendar title first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChangeLogEntry {
    pub calendar: String,
    pub change: Change,
}

impl ChangeLogEntry {
    pub fn added(calendar: &str, game: &Game) -> Self {
        ChangeLogEntry {
            calendar: calendar.to_string(),
            change: Change::Added(game.clone()),
        }
    }

    pub fn updated(calendar: &str, game: &Game) -> Self {
        ChangeLogEntry {
            calendar: calendar.to_string(),
            change: Change::Updated(game.clone()),
        }
    }

    pub fn removed(calendar: &str, game_id: GameId, game: Option<&Game>) -> Self {
        ChangeLogEntry {
            calendar: calendar.to_string(),
            change: Change::Removed {
                game_id,
                game: game.cloned(),
            },
        }
    }

    pub fn action(&self) -> Action {
        self.change.action()
    }
}

impl fmt::Display for ChangeLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.calendar, self.change)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeCounts {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

impl ChangeCounts {
    pub fn total(&self) -> usize {
        self.added + self.updated + self.removed
    }
}

/// The sorted set of entries produced by one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLog {
    entries: BTreeSet<ChangeLogEntry>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: ChangeLogEntry) {
        self.entries.insert(entry);
    }

    pub fn merge(&mut self, other: ChangeLog) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChangeLogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn counts(&self) -> ChangeCounts {
        let mut counts = ChangeCounts::default();
        for entry in &self.entries {
            match entry.action() {
                Action::Added => counts.added += 1,
                Action::Updated => counts.updated += 1,
                Action::Removed => counts.removed += 1,
            }
        }
        counts
    }
}

impl FromIterator<ChangeLogEntry> for ChangeLog {
    fn from_iter<I: IntoIterator<Item = ChangeLogEntry>>(iter: I) -> Self {
        ChangeLog {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ChangeLog {
    type Item = ChangeLogEntry;
    type IntoIter = std::collections::btree_set::IntoIter<ChangeLogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeLog {
    type Item = &'a ChangeLogEntry;
    type IntoIter = std::collections::btree_set::Iter<'a, ChangeLogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for ChangeLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}
