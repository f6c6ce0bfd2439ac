use tracing::info;

use crate::calendar::CalendarTarget;
use crate::config::HammersConfig;
use crate::error::CalendarResult;
use crate::remote::{RemoteCalendar, RemoteCalendarInfo};
use crate::sync::SyncEngine;

impl<R: RemoteCalendar> SyncEngine<R> {
    /// Create missing remote calendars and refresh the metadata of the rest.
    ///
    /// New remote ids are written into `config` as they are assigned, so the
    /// caller can save it even when a later calendar fails.
    pub async fn ensure_calendars(
        &self,
        config: &mut HammersConfig,
    ) -> CalendarResult<Vec<CalendarTarget>> {
        let timezone = config.tz()?;

        for calendar in &mut config.calendars {
            let title = calendar.title();
            let remote_id = self
                .api
                .create_or_update_calendar(
                    calendar.remote_id.as_deref(),
                    &title,
                    &calendar.description(),
                    timezone.name(),
                    &config.calendar_location,
                )
                .await?;

            if calendar.remote_id.as_deref() != Some(remote_id.as_str()) {
                info!(title = %title, remote_id = %remote_id, "Assigned remote calendar");
                calendar.remote_id = Some(remote_id);
            }
        }

        config.targets()
    }

    pub async fn list_calendars(&self) -> CalendarResult<Vec<RemoteCalendarInfo>> {
        self.api.list_all_calendars().await
    }
}
