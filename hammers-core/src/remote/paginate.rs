//! Cursor loops over the paginated list calls, and calendar provisioning.

use tracing::{debug, info};

use crate::error::CalendarResult;
use crate::remote::{
    AuthAwareCalendar, EventQuery, RemoteCalendar, RemoteCalendarInfo, RemoteEvent,
};

impl<R: RemoteCalendar> AuthAwareCalendar<R> {
    /// Every event matching `query`, following page tokens to the end.
    pub async fn list_all_events(
        &self,
        calendar_id: &str,
        query: &EventQuery,
    ) -> CalendarResult<Vec<RemoteEvent>> {
        let mut events = Vec::new();
        let mut page_token = None;

        loop {
            let page = self.list_events(calendar_id, &query.page(page_token)).await?;
            debug!(
                calendar = calendar_id,
                count = page.items.len(),
                "Fetched page of events"
            );
            events.extend(page.items);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(events)
    }

    pub async fn list_all_calendars(&self) -> CalendarResult<Vec<RemoteCalendarInfo>> {
        let mut calendars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.list_calendars(page_token.as_deref()).await?;
            debug!(count = page.items.len(), "Fetched page of calendars");
            calendars.extend(page.items);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(calendars)
    }

    /// Create a calendar when `remote_id` is `None`, otherwise overwrite its
    /// title, description, timezone and location. Returns the calendar id.
    pub async fn create_or_update_calendar(
        &self,
        remote_id: Option<&str>,
        title: &str,
        description: &str,
        timezone: &str,
        location: &str,
    ) -> CalendarResult<String> {
        match remote_id {
            None => {
                info!(title, "Creating calendar");
                let calendar = RemoteCalendarInfo {
                    id: String::new(),
                    summary: title.to_string(),
                    description: Some(description.to_string()),
                    time_zone: Some(timezone.to_string()),
                    location: Some(location.to_string()),
                };
                let created = self.insert_calendar(&calendar).await?;
                Ok(created.id)
            }
            Some(id) => {
                info!(title, id, "Updating calendar");
                let mut calendar = self.get_calendar(id).await?;
                calendar.summary = title.to_string();
                calendar.description = Some(description.to_string());
                calendar.time_zone = Some(timezone.to_string());
                calendar.location = Some(location.to_string());
                self.update_calendar(id, &calendar).await?;
                Ok(id.to_string())
            }
        }
    }
}
