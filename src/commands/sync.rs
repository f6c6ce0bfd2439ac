use anyhow::Result;

use crate::commands::Context;
use crate::render::Render;

pub async fn run(ctx: &Context, calendar: Option<&str>) -> Result<()> {
    let mut targets = ctx.config.targets()?;
    if let Some(filter) = calendar {
        targets.retain(|target| target.kind.to_string() == filter || target.title == filter);
        if targets.is_empty() {
            let available: Vec<_> = ctx.config.calendars.iter().map(|c| c.title()).collect();
            anyhow::bail!(
                "Calendar '{}' not found. Available: {}",
                filter,
                available.join(", ")
            );
        }
    }

    let games = ctx.snapshot()?;
    let engine = ctx.engine()?;

    let log = engine.sync_all(&targets, &games).await?;

    println!("{}", log.render());
    Ok(())
}
