use super::sync_activity_reminders::{
    ActivityOperation, SyncActivityRemindersUseCase, SyncOutcome, UseCaseError,
};
use crate::shared::usecase::UseCase;
use activity_scheduler_infra::SchedulerContext;
use chrono::{DateTime, Utc};
use tracing::{error, warn};

/// Syncs the reminders of every stored `Activity`, so that occurrences
/// moving into the actionable window get their notifications without the
/// `Activity` being edited
#[derive(Debug)]
pub struct ResweepActivityRemindersUseCase {
    pub now: DateTime<Utc>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ResweepReport {
    pub synced: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[async_trait::async_trait]
impl UseCase for ResweepActivityRemindersUseCase {
    type Response = ResweepReport;

    type Error = UseCaseError;

    const NAME: &'static str = "ResweepActivityReminders";

    async fn execute(&mut self, ctx: &SchedulerContext) -> Result<Self::Response, Self::Error> {
        let activity_ids = ctx
            .repos
            .activities
            .find_all_ids()
            .await
            .map_err(UseCaseError::StorageError)?;

        let mut report = ResweepReport::default();
        for activity_id in activity_ids {
            let mut usecase = SyncActivityRemindersUseCase {
                activity_id: activity_id.clone(),
                operation: ActivityOperation::Resweep,
                now: self.now,
            };
            match usecase.execute(ctx).await {
                Ok(SyncOutcome::Synced { .. }) => report.synced += 1,
                Ok(_) => report.skipped += 1,
                Err(UseCaseError::StorageError(e)) => {
                    error!(
                        "Unable to sync reminders for activity: {}. Error: {:?}",
                        activity_id, e
                    );
                    report.failed += 1;
                }
                Err(e) => {
                    warn!("Skipping activity: {} in resweep: {}", activity_id, e);
                    report.skipped += 1;
                }
            }
        }

        ctx.locks.prune();

        Ok(report)
    }
}
