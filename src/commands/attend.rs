use anyhow::Result;
use hammers_core::{CalendarError, GameId};
use owo_colors::OwoColorize;

use crate::commands::Context;

/// Move one game between the attended and unattended calendars and record
/// the new attended flag in the snapshot.
pub async fn run(ctx: &Context, game_id: GameId, attended: bool) -> Result<()> {
    let mut games = ctx.snapshot()?;
    let game = games
        .get(game_id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("No game with id {game_id} in the snapshot"))?;

    if game.attended == attended {
        println!("{} is already marked as {}", game, label(attended));
        return Ok(());
    }

    let targets = ctx.config.targets()?;
    let engine = ctx.engine()?;
    let moved = if attended {
        engine.attend(&targets, &game).await
    } else {
        engine.unattend(&targets, &game).await
    };

    match moved {
        Ok(()) => {}
        // Not published yet: the next sync puts it in the right calendar.
        Err(CalendarError::GameNotFoundInSource { calendar, .. }) => {
            println!(
                "{}",
                format!("{game} is not in '{calendar}' yet; run `hammers sync` to publish it")
                    .yellow()
            );
        }
        Err(err) => return Err(err.into()),
    }

    games.set_attended(game_id, attended)?;
    games.save(&ctx.config.games_path())?;

    println!("{} {}", game, label(attended).green());
    Ok(())
}

fn label(attended: bool) -> &'static str {
    if attended { "attended" } else { "not attended" }
}
