use crate::shared::usecase::UseCase;
use activity_scheduler_infra::SchedulerContext;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use thiserror::Error;
use tracing::error;

/// Claims every unsent `ScheduledNotification` that is due at `now` and
/// delivers it. Failed deliveries are released back to unsent and are
/// picked up again by the next run.
#[derive(Debug)]
pub struct SendDueNotificationsUseCase {
    pub now: DateTime<Utc>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SendReport {
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("Storage error: {0}")]
    StorageError(anyhow::Error),
}

#[async_trait::async_trait]
impl UseCase for SendDueNotificationsUseCase {
    type Response = SendReport;

    type Error = UseCaseError;

    const NAME: &'static str = "SendDueNotifications";

    async fn execute(&mut self, ctx: &SchedulerContext) -> Result<Self::Response, Self::Error> {
        // Claimed notifications are already marked as sent, so overlapping
        // runs never deliver the same notification twice
        let due = ctx
            .repos
            .scheduled_notifications
            .claim_due(self.now)
            .await
            .map_err(UseCaseError::StorageError)?;
        if due.is_empty() {
            return Ok(SendReport::default());
        }

        let results = join_all(
            due.iter()
                .map(|notification| ctx.notification_sender.send(notification)),
        )
        .await;

        let mut failed = Vec::new();
        for (notification, res) in due.iter().zip(results) {
            if let Err(e) = res {
                error!(
                    "Unable to deliver notification: {} for activity: {}. Error: {:?}",
                    notification.id, notification.activity_id, e
                );
                failed.push(notification.id.clone());
            }
        }

        if !failed.is_empty() {
            ctx.repos
                .scheduled_notifications
                .release_claimed(&failed)
                .await
                .map_err(UseCaseError::StorageError)?;
        }

        Ok(SendReport {
            delivered: due.len() - failed.len(),
            failed: failed.len(),
        })
    }
}
