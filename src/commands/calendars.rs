use anyhow::Result;

use crate::commands::Context;
use crate::render;
use crate::utils::tui;

pub async fn run(mut ctx: Context, ensure: bool) -> Result<()> {
    let engine = ctx.engine()?;

    if ensure {
        let result = engine.ensure_calendars(&mut ctx.config).await;
        // Keep any ids assigned before a failure.
        ctx.save_config()?;
        let targets = result?;
        println!("{} calendars ready", targets.len());
    }

    let spinner = tui::create_spinner("Fetching calendars".to_string());
    let calendars = engine.list_calendars().await;
    spinner.finish_and_clear();

    for calendar in calendars? {
        let configured = ctx
            .config
            .calendars
            .iter()
            .any(|c| c.remote_id.as_deref() == Some(calendar.id.as_str()));
        println!("{}", render::render_calendar(&calendar, configured));
    }

    Ok(())
}
