use tracing::info;

use crate::calendar::CalendarTarget;
use crate::error::CalendarResult;
use crate::game::GameSnapshot;
use crate::remote::RemoteCalendar;
use crate::sync::{ChangeLog, SyncEngine};

impl<R: RemoteCalendar> SyncEngine<R> {
    /// Reconcile every target in the given order and merge the results.
    ///
    /// The first failure aborts the pass. Changes already made stay made;
    /// running the pass again picks up where it stopped.
    pub async fn sync_all(
        &self,
        targets: &[CalendarTarget],
        games: &GameSnapshot,
    ) -> CalendarResult<ChangeLog> {
        let mut log = ChangeLog::new();

        for target in targets {
            info!(calendar = %target.title, "Synchronising calendar");
            let changes = self.reconcile(target, games).await?;
            info!(
                calendar = %target.title,
                changes = changes.len(),
                "Calendar synchronised"
            );
            log.merge(changes);
        }

        Ok(log)
    }
}
