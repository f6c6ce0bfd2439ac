//! Google Calendar v3 backend for the hammers calendar engine.
//!
//! `GoogleCalendarClient` implements `hammers_core::remote::RemoteCalendar`
//! over the REST API. It gets its bearer token from an `AccessTokenSource`,
//! normally a `Session` that refreshes itself from the saved OAuth tokens.

mod app_config;
mod client;
mod convert;
mod retry;
mod session;
mod types;

pub use app_config::{AppConfig, base_dir};
pub use client::GoogleCalendarClient;
pub use retry::RetryPolicy;
pub use session::{AccessTokenSource, BearerToken, Session, SessionData};
