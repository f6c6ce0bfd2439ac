use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::calendar::CalendarTarget;
use crate::error::CalendarResult;
use crate::game::{GameId, GameSnapshot};
use crate::remote::{EventQuery, RemoteCalendar, RemoteEvent};
use crate::sync::{ChangeLog, ChangeLogEntry, SyncEngine};

/// Live events of one calendar, keyed by the game they were published for.
struct PublishedEvents {
    by_game: BTreeMap<GameId, RemoteEvent>,
    /// Second and later events found for a game already in `by_game`.
    duplicates: Vec<(GameId, String)>,
}

impl PublishedEvents {
    fn from_events(events: Vec<RemoteEvent>) -> Self {
        let mut by_game = BTreeMap::new();
        let mut duplicates = Vec::new();

        // Events without a game id are not ours.
        for event in events {
            let Some(game_id) = event.live_game_id() else {
                continue;
            };
            if by_game.contains_key(&game_id) {
                duplicates.push((game_id, event.id));
            } else {
                by_game.insert(game_id, event);
            }
        }

        PublishedEvents {
            by_game,
            duplicates,
        }
    }
}

impl<R: RemoteCalendar> SyncEngine<R> {
    /// Bring one calendar in line with the games it should show.
    ///
    /// Creates events for new members, updates events whose owned fields
    /// drifted, and deletes events for games that no longer belong here.
    pub async fn reconcile(
        &self,
        target: &CalendarTarget,
        games: &GameSnapshot,
    ) -> CalendarResult<ChangeLog> {
        let calendar_id = target.remote_id.as_str();
        let calendar = target.title.as_str();
        let mut log = ChangeLog::new();

        let events = self
            .api
            .list_all_events(calendar_id, &EventQuery::default().with_deleted())
            .await?;
        let PublishedEvents {
            by_game: mut published,
            duplicates,
        } = PublishedEvents::from_events(events);

        for game in games.iter().filter(|game| target.contains(game)) {
            let existing = published.remove(&game.id);

            let interval = match target.interval_for(game) {
                Ok(interval) => interval,
                Err(err) => {
                    warn!(calendar, game_id = game.id, "Skipping game: {err}");
                    continue;
                }
            };
            let content = self.renderer.render(game, target, interval);

            match existing {
                None => {
                    info!(calendar, game_id = game.id, "Creating {}", game);
                    self.api
                        .insert_event(calendar_id, &content.to_new_event(game.id))
                        .await?;
                    log.insert(ChangeLogEntry::added(calendar, game));
                }
                Some(mut event) => {
                    let changed = content.changed_fields(&event);
                    if changed.is_empty() {
                        debug!(calendar, game_id = game.id, "Ignoring unchanged {}", game);
                        continue;
                    }

                    info!(
                        calendar,
                        game_id = game.id,
                        fields = ?changed,
                        "Updating {}",
                        game
                    );
                    content.apply_to(&mut event);
                    self.api.update_event(calendar_id, &event.id, &event).await?;
                    log.insert(ChangeLogEntry::updated(calendar, game));
                }
            }
        }

        let stale = published
            .into_iter()
            .map(|(game_id, event)| (game_id, event.id))
            .chain(duplicates);
        for (game_id, event_id) in stale {
            let game = games.get(game_id);
            match game {
                Some(game) => info!(calendar, game_id, "Removing {}", game),
                None => info!(calendar, game_id, "Removing unknown game"),
            }
            self.api.delete_event(calendar_id, &event_id).await?;
            log.insert(ChangeLogEntry::removed(calendar, game_id, game));
        }

        Ok(log)
    }
}
