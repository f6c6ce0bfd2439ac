//! Wraps a `RemoteCalendar` so that authentication failures stand out.

use crate::error::{CalendarError, CalendarResult};
use crate::remote::{
    CalendarPage, EventPage, EventQuery, RemoteCalendar, RemoteCalendarInfo, RemoteError,
    RemoteEvent,
};

const FORBIDDEN: u16 = 403;

/// Turn a transport error into an engine error.
///
/// A 403 means the credential is no longer accepted and the user has to
/// authorise again; anything else is an ordinary service failure.
pub fn classify(err: RemoteError) -> CalendarError {
    if err.status == Some(FORBIDDEN) {
        CalendarError::AuthenticationRequired {
            request: err.request(),
            source: err,
        }
    } else {
        CalendarError::RemoteService(err)
    }
}

/// Every remote call the engine makes goes through here.
#[derive(Debug, Clone)]
pub struct AuthAwareCalendar<R> {
    inner: R,
}

impl<R: RemoteCalendar> AuthAwareCalendar<R> {
    pub fn new(inner: R) -> Self {
        AuthAwareCalendar { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub async fn list_events(
        &self,
        calendar_id: &str,
        query: &EventQuery,
    ) -> CalendarResult<EventPage> {
        self.inner
            .list_events(calendar_id, query)
            .await
            .map_err(classify)
    }

    pub async fn get_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> CalendarResult<RemoteEvent> {
        self.inner
            .get_event(calendar_id, event_id)
            .await
            .map_err(classify)
    }

    pub async fn insert_event(
        &self,
        calendar_id: &str,
        event: &RemoteEvent,
    ) -> CalendarResult<RemoteEvent> {
        self.inner
            .insert_event(calendar_id, event)
            .await
            .map_err(classify)
    }

    pub async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &RemoteEvent,
    ) -> CalendarResult<RemoteEvent> {
        self.inner
            .update_event(calendar_id, event_id, event)
            .await
            .map_err(classify)
    }

    pub async fn delete_event(&self, calendar_id: &str, event_id: &str) -> CalendarResult<()> {
        self.inner
            .delete_event(calendar_id, event_id)
            .await
            .map_err(classify)
    }

    pub async fn move_event(
        &self,
        source_calendar_id: &str,
        event_id: &str,
        destination_calendar_id: &str,
    ) -> CalendarResult<RemoteEvent> {
        self.inner
            .move_event(source_calendar_id, event_id, destination_calendar_id)
            .await
            .map_err(classify)
    }

    pub async fn list_calendars(&self, page_token: Option<&str>) -> CalendarResult<CalendarPage> {
        self.inner.list_calendars(page_token).await.map_err(classify)
    }

    pub async fn get_calendar(&self, calendar_id: &str) -> CalendarResult<RemoteCalendarInfo> {
        self.inner.get_calendar(calendar_id).await.map_err(classify)
    }

    pub async fn insert_calendar(
        &self,
        calendar: &RemoteCalendarInfo,
    ) -> CalendarResult<RemoteCalendarInfo> {
        self.inner.insert_calendar(calendar).await.map_err(classify)
    }

    pub async fn update_calendar(
        &self,
        calendar_id: &str,
        calendar: &RemoteCalendarInfo,
    ) -> CalendarResult<RemoteCalendarInfo> {
        self.inner
            .update_calendar(calendar_id, calendar)
            .await
            .map_err(classify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryCalendar;

    #[test]
    fn test_classify_forbidden_as_authentication_required() {
        let err = classify(RemoteError::http(
            403,
            "GET",
            "https://example.com/calendars/a/events",
            "Forbidden",
        ));

        match err {
            CalendarError::AuthenticationRequired { request, source } => {
                assert_eq!(request, "GET https://example.com/calendars/a/events");
                assert_eq!(source.status, Some(403));
            }
            other => panic!("Expected AuthenticationRequired, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_other_failures_as_remote_service_errors() {
        for err in [
            RemoteError::http(401, "GET", "u", "Unauthorized"),
            RemoteError::http(404, "GET", "u", "Not Found"),
            RemoteError::http(500, "POST", "u", "Backend Error"),
            RemoteError::transport("GET", "u", "connection reset"),
        ] {
            let classified = classify(err.clone());
            assert!(!classified.is_authentication_required());
            match classified {
                CalendarError::RemoteService(inner) => assert_eq!(inner, err),
                other => panic!("Expected RemoteService, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_successful_calls_pass_through_unchanged() {
        let memory = MemoryCalendar::new();
        memory.add_calendar("cal");
        let api = AuthAwareCalendar::new(memory);

        let page = api.list_events("cal", &EventQuery::default()).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.next_page_token, None);
    }

    #[tokio::test]
    async fn test_forbidden_from_inner_calendar_is_reclassified() {
        let memory = MemoryCalendar::new();
        memory.add_calendar("cal");
        memory.fail_next(403);
        let api = AuthAwareCalendar::new(memory);

        let err = api.delete_event("cal", "missing").await.unwrap_err();
        assert!(err.is_authentication_required());

        // Only the next call fails.
        let err = api.delete_event("cal", "missing").await.unwrap_err();
        assert!(matches!(
            err,
            CalendarError::RemoteService(RemoteError {
                status: Some(404),
                ..
            })
        ));
    }
}
