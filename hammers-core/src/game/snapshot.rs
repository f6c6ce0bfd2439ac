//! A point-in-time collection of games, indexed by id and by natural key.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{CalendarError, CalendarResult};
use crate::game::{Game, GameId, GameKey};

/// The games a sync pass works from. Read-only to the engine.
#[derive(Debug, Clone, Default)]
pub struct GameSnapshot {
    games: Vec<Game>,
    by_id: HashMap<GameId, usize>,
    by_key: HashMap<GameKey, usize>,
}

impl GameSnapshot {
    /// Build a snapshot, rejecting duplicate ids and duplicate natural keys.
    pub fn new(games: Vec<Game>) -> CalendarResult<Self> {
        let mut by_id = HashMap::with_capacity(games.len());
        let mut by_key = HashMap::with_capacity(games.len());

        for (index, game) in games.iter().enumerate() {
            if by_id.insert(game.id, index).is_some() {
                return Err(CalendarError::GameSnapshot(format!(
                    "duplicate game id {}",
                    game.id
                )));
            }
            if by_key.insert(game.key(), index).is_some() {
                return Err(CalendarError::GameSnapshot(format!(
                    "duplicate game {}",
                    game.key()
                )));
            }
        }

        Ok(GameSnapshot {
            games,
            by_id,
            by_key,
        })
    }

    /// Load a snapshot from a JSON array of games.
    pub fn load(path: &Path) -> CalendarResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CalendarError::GameSnapshot(format!("Could not read {}: {e}", path.display()))
        })?;

        let games: Vec<Game> = serde_json::from_str(&contents).map_err(|e| {
            CalendarError::GameSnapshot(format!("Could not parse {}: {e}", path.display()))
        })?;

        Self::new(games)
    }

    pub fn save(&self, path: &Path) -> CalendarResult<()> {
        let contents = serde_json::to_string_pretty(&self.games)
            .map_err(|e| CalendarError::GameSnapshot(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;

        Ok(())
    }

    pub fn get(&self, id: GameId) -> Option<&Game> {
        self.by_id.get(&id).map(|&index| &self.games[index])
    }

    pub fn find_by_key(&self, key: &GameKey) -> Option<&Game> {
        self.by_key.get(key).map(|&index| &self.games[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Game> {
        self.games.iter()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Record whether a game was attended. The natural key is untouched so the
    /// indexes stay valid.
    pub fn set_attended(&mut self, id: GameId, attended: bool) -> CalendarResult<()> {
        let index = *self
            .by_id
            .get(&id)
            .ok_or_else(|| CalendarError::GameSnapshot(format!("no game with id {id}")))?;
        self.games[index].attended = attended;
        Ok(())
    }
}
