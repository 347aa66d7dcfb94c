use crate::shared::usecase::UseCase;
use activity_scheduler_domain::{plan_notifications, ID};
use activity_scheduler_infra::SchedulerContext;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityOperation {
    Created,
    Updated,
    Deleted,
    /// Periodic job syncing every `Activity` so that the actionable window
    /// keeps moving for activities that are not edited
    Resweep,
}

/// Replaces the unsent `ScheduledNotification`s of an `Activity` with the
/// ones that should exist at `now`.
///
/// Sent notifications are never touched. A deleted `Activity` only gets
/// its unsent notifications removed.
#[derive(Debug)]
pub struct SyncActivityRemindersUseCase {
    pub activity_id: ID,
    pub operation: ActivityOperation,
    pub now: DateTime<Utc>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced { removed: i64, created: usize },
    /// The `Activity` is gone, so its reminders were only cleaned up
    Cleaned { removed: i64 },
    /// Another sync of the same `Activity` started after this one, so the
    /// computed notifications were dropped in favour of that one
    Superseded { removed: i64 },
}

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("Storage error: {0}")]
    StorageError(anyhow::Error),
    #[error("The user with id: {0}, was not found.")]
    UserNotFound(ID),
    #[error("The child with id: {0}, was not found.")]
    ChildNotFound(ID),
}

impl SyncActivityRemindersUseCase {
    async fn cleanup(&self, ctx: &SchedulerContext) -> Result<i64, UseCaseError> {
        let notifications = &ctx.repos.scheduled_notifications;
        // Makes concurrent syncs elsewhere drop their results
        notifications
            .inc_version(&self.activity_id)
            .await
            .map_err(UseCaseError::StorageError)?;
        let res = notifications
            .delete_unsent_by_activity(&self.activity_id)
            .await
            .map_err(UseCaseError::StorageError)?;
        Ok(res.deleted_count)
    }
}

#[async_trait::async_trait]
impl UseCase for SyncActivityRemindersUseCase {
    type Response = SyncOutcome;

    type Error = UseCaseError;

    const NAME: &'static str = "SyncActivityReminders";

    async fn execute(&mut self, ctx: &SchedulerContext) -> Result<Self::Response, Self::Error> {
        let _guard = ctx.locks.lock(&self.activity_id).await;

        let activity = match self.operation {
            ActivityOperation::Deleted => None,
            _ => ctx
                .repos
                .activities
                .find(&self.activity_id)
                .await
                .map_err(UseCaseError::StorageError)?,
        };
        let activity = match activity {
            Some(activity) => activity,
            None => {
                let removed = self.cleanup(ctx).await?;
                info!(
                    "Removed {} unsent notifications for deleted activity: {}",
                    removed, self.activity_id
                );
                return Ok(SyncOutcome::Cleaned { removed });
            }
        };

        let user = ctx
            .repos
            .users
            .find(&activity.user_id)
            .await
            .map_err(UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::UserNotFound(activity.user_id.clone()))?;
        let child = ctx
            .repos
            .children
            .find(&activity.child_id)
            .await
            .map_err(UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::ChildNotFound(activity.child_id.clone()))?;

        let notifications = &ctx.repos.scheduled_notifications;
        let version = notifications
            .inc_version(&activity.id)
            .await
            .map_err(UseCaseError::StorageError)?;
        let removed = notifications
            .delete_unsent_by_activity(&activity.id)
            .await
            .map_err(UseCaseError::StorageError)?
            .deleted_count;

        let planned = plan_notifications(&activity, &user, &child, self.now);

        let committed = notifications
            .bulk_insert_if_version(&activity.id, version, &planned)
            .await
            .map_err(UseCaseError::StorageError)?;
        if !committed {
            warn!(
                "Reminder sync version {} for activity: {} was superseded by a later sync",
                version, activity.id
            );
            return Ok(SyncOutcome::Superseded { removed });
        }

        Ok(SyncOutcome::Synced {
            removed,
            created: planned.len(),
        })
    }
}
