//! Keeping remote calendars in step with the game snapshot.
//!
//! `SyncEngine` owns the auth-aware remote client and the event renderer.
//! Its operations are split by concern:
//! - `reconcile` diffs one calendar against the games it should show
//! - `sync_all` runs `reconcile` for each configured calendar in order
//! - `move_event_between`, `attend` and `unattend` move one game's event
//! - `ensure_calendars` creates or updates the remote calendars themselves
//!
//! Remote calls are awaited one at a time. Nothing here retries: a failure
//! aborts the pass and re-running it is the recovery path.

mod change_log;
mod move_game;
mod orchestrate;
mod provision;
mod reconcile;

use crate::calendar::EventRenderer;
use crate::remote::{AuthAwareCalendar, RemoteCalendar};

pub use change_log::{Action, Change, ChangeCounts, ChangeLog, ChangeLogEntry};

pub struct SyncEngine<R> {
    api: AuthAwareCalendar<R>,
    renderer: EventRenderer,
}

impl<R: RemoteCalendar> SyncEngine<R> {
    pub fn new(remote: R, renderer: EventRenderer) -> Self {
        SyncEngine {
            api: AuthAwareCalendar::new(remote),
            renderer,
        }
    }

    pub fn api(&self) -> &AuthAwareCalendar<R> {
        &self.api
    }

    pub fn renderer(&self) -> &EventRenderer {
        &self.renderer
    }
}
