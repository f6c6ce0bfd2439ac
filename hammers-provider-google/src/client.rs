//! Google Calendar v3 over REST.

use chrono::{DateTime, SecondsFormat, Utc};
use hammers_core::remote::{
    CalendarPage, EventPage, EventQuery, RemoteCalendar, RemoteCalendarInfo, RemoteError,
    RemoteEvent,
};
use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::convert::{FromGoogle, ToGoogle};
use crate::retry::{RetryPolicy, send_with_retry};
use crate::session::AccessTokenSource;
use crate::types::{
    GoogleCalendar, GoogleCalendarList, GoogleErrorResponse, GoogleEvent, GoogleEventList,
};

const API_BASE: &str = "https://www.googleapis.com/calendar/v3/";

const PAGE_SIZE: &str = "250";

/// A `RemoteCalendar` backed by the Google Calendar API.
pub struct GoogleCalendarClient<T> {
    http: reqwest::Client,
    base: Url,
    tokens: T,
    retry: RetryPolicy,
}

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl<T: AccessTokenSource> GoogleCalendarClient<T> {
    pub fn new(tokens: T) -> Result<Self, url::ParseError> {
        Self::with_base_url(tokens, API_BASE)
    }

    pub fn with_base_url(tokens: T, base: &str) -> Result<Self, url::ParseError> {
        Ok(GoogleCalendarClient {
            http: reqwest::Client::new(),
            base: Url::parse(base)?,
            tokens,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The base URL with `segments` appended, each percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Response, RemoteError> {
        let token = self.tokens.access_token().await?;

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .bearer_auth(token)
            .query(query);
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, %url, "Calling Google Calendar API");
        let response = send_with_retry(request, &self.retry)
            .await
            .map_err(|e| RemoteError::transport(method.as_str(), url.as_str(), e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<GoogleErrorResponse>(&text)
            .map(|body| body.error.message)
            .unwrap_or(text);
        Err(RemoteError::http(
            status.as_u16(),
            method.as_str(),
            url.as_str(),
            message,
        ))
    }

    async fn json<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<R, RemoteError> {
        let response = self.send(method.clone(), url.clone(), query, body).await?;

        response.json::<R>().await.map_err(|e| {
            RemoteError::transport(
                method.as_str(),
                url.as_str(),
                format!("Malformed response: {e}"),
            )
        })
    }

    async fn event<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<RemoteEvent, RemoteError> {
        let google: GoogleEvent = self.json(method.clone(), url.clone(), query, body).await?;
        RemoteEvent::from_google(google)
            .map_err(|e| RemoteError::transport(method.as_str(), url.as_str(), e.to_string()))
    }

    async fn calendar<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<RemoteCalendarInfo, RemoteError> {
        let google: GoogleCalendar = self.json(method.clone(), url.clone(), &[], body).await?;
        RemoteCalendarInfo::from_google(google)
            .map_err(|e| RemoteError::transport(method.as_str(), url.as_str(), e.to_string()))
    }
}

fn event_query(query: &EventQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("maxResults", PAGE_SIZE.to_string()),
        ("showDeleted", query.show_deleted.to_string()),
        ("singleEvents", "false".to_string()),
    ];
    if let Some(time_min) = query.time_min {
        params.push(("timeMin", rfc3339(time_min)));
    }
    if let Some(time_max) = query.time_max {
        params.push(("timeMax", rfc3339(time_max)));
    }
    if let Some(token) = &query.page_token {
        params.push(("pageToken", token.clone()));
    }
    params
}

const NO_BODY: Option<&()> = None;

impl<T: AccessTokenSource> RemoteCalendar for GoogleCalendarClient<T> {
    async fn list_events(
        &self,
        calendar_id: &str,
        query: &EventQuery,
    ) -> Result<EventPage, RemoteError> {
        let url = self.url(&["calendars", calendar_id, "events"]);
        let list: GoogleEventList = self
            .json(Method::GET, url.clone(), &event_query(query), NO_BODY)
            .await?;

        let items = list
            .items
            .into_iter()
            .map(RemoteEvent::from_google)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| RemoteError::transport("GET", url.as_str(), e.to_string()))?;

        Ok(EventPage {
            items,
            next_page_token: list.next_page_token,
        })
    }

    async fn get_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<RemoteEvent, RemoteError> {
        let url = self.url(&["calendars", calendar_id, "events", event_id]);
        self.event(Method::GET, url, &[], NO_BODY).await
    }

    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &RemoteEvent,
    ) -> Result<RemoteEvent, RemoteError> {
        let url = self.url(&["calendars", calendar_id, "events"]);
        let mut body: GoogleEvent = event.to_google();
        body.id = String::new();
        self.event(Method::POST, url, &[], Some(&body)).await
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &RemoteEvent,
    ) -> Result<RemoteEvent, RemoteError> {
        // PATCH keeps reminders, colour and anything else we don't render.
        let url = self.url(&["calendars", calendar_id, "events", event_id]);
        let mut body: GoogleEvent = event.to_google();
        body.id = String::new();
        // An omitted field is left alone by PATCH, so send "" to clear.
        body.description = Some(event.description.clone().unwrap_or_default());
        self.event(Method::PATCH, url, &[], Some(&body)).await
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<(), RemoteError> {
        let url = self.url(&["calendars", calendar_id, "events", event_id]);
        match self.send(Method::DELETE, url, &[], NO_BODY).await {
            Ok(_) => Ok(()),
            // Already deleted.
            Err(err) if err.status == Some(410) => {
                debug!(event_id, "Event was already deleted");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn move_event(
        &self,
        source_calendar_id: &str,
        event_id: &str,
        destination_calendar_id: &str,
    ) -> Result<RemoteEvent, RemoteError> {
        let url = self.url(&["calendars", source_calendar_id, "events", event_id, "move"]);
        let query = [("destination", destination_calendar_id.to_string())];
        self.event(Method::POST, url, &query, NO_BODY).await
    }

    async fn list_calendars(&self, page_token: Option<&str>) -> Result<CalendarPage, RemoteError> {
        let url = self.url(&["users", "me", "calendarList"]);
        let mut query = vec![("maxResults", PAGE_SIZE.to_string())];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let list: GoogleCalendarList = self
            .json(Method::GET, url.clone(), &query, NO_BODY)
            .await?;

        let items = list
            .items
            .into_iter()
            .map(RemoteCalendarInfo::from_google)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| RemoteError::transport("GET", url.as_str(), e.to_string()))?;

        Ok(CalendarPage {
            items,
            next_page_token: list.next_page_token,
        })
    }

    async fn get_calendar(&self, calendar_id: &str) -> Result<RemoteCalendarInfo, RemoteError> {
        let url = self.url(&["calendars", calendar_id]);
        self.calendar(Method::GET, url, NO_BODY).await
    }

    async fn insert_calendar(
        &self,
        calendar: &RemoteCalendarInfo,
    ) -> Result<RemoteCalendarInfo, RemoteError> {
        let url = self.url(&["calendars"]);
        let mut body: GoogleCalendar = calendar.to_google();
        body.id = String::new();
        self.calendar(Method::POST, url, Some(&body)).await
    }

    async fn update_calendar(
        &self,
        calendar_id: &str,
        calendar: &RemoteCalendarInfo,
    ) -> Result<RemoteCalendarInfo, RemoteError> {
        let url = self.url(&["calendars", calendar_id]);
        let body: GoogleCalendar = calendar.to_google();
        self.calendar(Method::PUT, url, Some(&body)).await
    }
}
