use anyhow::Result;

use crate::commands::Context;
use crate::render;

pub fn run(ctx: &Context, season: Option<u16>) -> Result<()> {
    let games = ctx.snapshot()?;
    let renderer = ctx.config.renderer()?;

    let mut shown: Vec<_> = games
        .iter()
        .filter(|game| season.is_none_or(|season| game.season == season))
        .collect();
    shown.sort_by_key(|game| game.kickoff);

    for game in shown {
        println!("{}", render::render_game(game, &renderer));
    }

    Ok(())
}
