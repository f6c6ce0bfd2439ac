use chrono::{DateTime, Utc};
use tracing::info;

use crate::calendar::{CalendarKind, CalendarTarget};
use crate::error::{CalendarError, CalendarResult};
use crate::game::{Game, GameId};
use crate::remote::{EventLocator, RemoteCalendar, Transparency};
use crate::sync::SyncEngine;

fn find_target(targets: &[CalendarTarget], kind: CalendarKind) -> CalendarResult<&CalendarTarget> {
    targets
        .iter()
        .find(|target| target.kind == kind)
        .ok_or_else(|| CalendarError::UnknownCalendar(kind.to_string()))
}

impl<R: RemoteCalendar> SyncEngine<R> {
    /// Move the event published for `game_id` from one calendar to another.
    ///
    /// The event is found by searching outward from `anchor`. If its busy
    /// flag does not match `busy` it gets one extra update after the move.
    pub async fn move_event_between(
        &self,
        source_calendar_id: &str,
        target_calendar_id: &str,
        game_id: GameId,
        anchor: DateTime<Utc>,
        busy: bool,
    ) -> CalendarResult<()> {
        let located = EventLocator::new(&self.api)
            .find(source_calendar_id, game_id, anchor)
            .await?
            .ok_or_else(|| CalendarError::GameNotFoundInSource {
                game_id,
                calendar: source_calendar_id.to_string(),
            })?;

        info!(
            game_id,
            from = source_calendar_id,
            to = target_calendar_id,
            window = %located.window,
            "Moving game"
        );
        let mut moved = self
            .api
            .move_event(source_calendar_id, &located.event_id, target_calendar_id)
            .await?;

        let transparency = Transparency::from_busy(busy);
        if moved.transparency != transparency {
            moved.transparency = transparency;
            let event_id = moved.id.clone();
            self.api
                .update_event(target_calendar_id, &event_id, &moved)
                .await?;
        }

        Ok(())
    }

    /// Move a game from the unattended calendar to the attended one.
    pub async fn attend(&self, targets: &[CalendarTarget], game: &Game) -> CalendarResult<()> {
        self.move_between_kinds(targets, game, CalendarKind::Unattended, CalendarKind::Attended)
            .await
    }

    /// Move a game from the attended calendar to the unattended one.
    pub async fn unattend(&self, targets: &[CalendarTarget], game: &Game) -> CalendarResult<()> {
        self.move_between_kinds(targets, game, CalendarKind::Attended, CalendarKind::Unattended)
            .await
    }

    async fn move_between_kinds(
        &self,
        targets: &[CalendarTarget],
        game: &Game,
        from: CalendarKind,
        to: CalendarKind,
    ) -> CalendarResult<()> {
        let source = find_target(targets, from)?;
        let destination = find_target(targets, to)?;

        self.move_event_between(
            &source.remote_id,
            &destination.remote_id,
            game.id,
            game.kickoff,
            destination.busy,
        )
        .await
        .map_err(|err| match err {
            CalendarError::GameNotFoundInSource { game_id, .. } => {
                CalendarError::GameNotFoundInSource {
                    game_id,
                    calendar: source.title.clone(),
                }
            }
            other => other,
        })
    }
}
