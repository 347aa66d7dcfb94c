use super::sync_activity_reminders::{
    ActivityOperation, SyncActivityRemindersUseCase, SyncOutcome, UseCaseError,
};
use crate::shared::usecase::UseCase;
use activity_scheduler_domain::ID;
use activity_scheduler_infra::SchedulerContext;
use thiserror::Error;
use tracing::{error, info, warn};

/// A write to the `Activity` store, described by whether the document
/// existed before and after the write
#[derive(Debug, Clone)]
pub struct ActivityChange {
    pub activity_id: ID,
    pub existed_before: bool,
    pub exists_after: bool,
}

impl ActivityChange {
    pub fn created(activity_id: &ID) -> Self {
        Self {
            activity_id: activity_id.clone(),
            existed_before: false,
            exists_after: true,
        }
    }

    pub fn updated(activity_id: &ID) -> Self {
        Self {
            activity_id: activity_id.clone(),
            existed_before: true,
            exists_after: true,
        }
    }

    pub fn deleted(activity_id: &ID) -> Self {
        Self {
            activity_id: activity_id.clone(),
            existed_before: true,
            exists_after: false,
        }
    }

    /// `None` when the write neither created nor kept the document
    pub fn operation(&self) -> Option<ActivityOperation> {
        match (self.existed_before, self.exists_after) {
            (false, true) => Some(ActivityOperation::Created),
            (true, true) => Some(ActivityOperation::Updated),
            (true, false) => Some(ActivityOperation::Deleted),
            (false, false) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum TriggerError {
    /// The caller should retry the whole invocation
    #[error("The store was unavailable: {0}")]
    StoreUnavailable(anyhow::Error),
}

/// Entry point for writes to the `Activity` store.
///
/// Missing owner or child is logged and ends the invocation without
/// retry. Storage failures are returned so that the caller retries, which
/// is safe because a sync can be repeated any number of times.
#[tracing::instrument(name = "Activity written", skip(ctx))]
pub async fn handle_activity_written(
    ctx: &SchedulerContext,
    change: ActivityChange,
) -> Result<Option<SyncOutcome>, TriggerError> {
    let operation = match change.operation() {
        Some(operation) => operation,
        None => {
            info!(
                "Ignoring write for activity: {} that never existed",
                change.activity_id
            );
            return Ok(None);
        }
    };

    let mut usecase = SyncActivityRemindersUseCase {
        activity_id: change.activity_id.clone(),
        operation,
        now: ctx.sys.get_timestamp(),
    };

    match usecase.execute(ctx).await {
        Ok(outcome) => {
            info!(
                "Synced reminders for activity: {} after {:?}: {:?}",
                change.activity_id, operation, outcome
            );
            Ok(Some(outcome))
        }
        Err(UseCaseError::UserNotFound(user_id)) => {
            warn!(
                "Skipping reminders for activity: {} because user: {} was not found",
                change.activity_id, user_id
            );
            Ok(None)
        }
        Err(UseCaseError::ChildNotFound(child_id)) => {
            warn!(
                "Skipping reminders for activity: {} because child: {} was not found",
                change.activity_id, child_id
            );
            Ok(None)
        }
        Err(UseCaseError::StorageError(e)) => {
            error!(
                "Unable to sync reminders for activity: {}. Error: {:?}",
                change.activity_id, e
            );
            Err(TriggerError::StoreUnavailable(e))
        }
    }
}
