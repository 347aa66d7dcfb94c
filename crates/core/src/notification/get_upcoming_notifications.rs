use crate::shared::usecase::UseCase;
use activity_scheduler_domain::{ScheduledNotification, ID};
use activity_scheduler_infra::SchedulerContext;
use thiserror::Error;

/// Unsent notifications of a `User`, earliest first
#[derive(Debug)]
pub struct GetUpcomingNotificationsUseCase {
    pub user_id: ID,
}

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("Storage error: {0}")]
    StorageError(anyhow::Error),
    #[error("The user with id: {0}, was not found.")]
    UserNotFound(ID),
}

#[async_trait::async_trait]
impl UseCase for GetUpcomingNotificationsUseCase {
    type Response = Vec<ScheduledNotification>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetUpcomingNotifications";

    async fn execute(&mut self, ctx: &SchedulerContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .users
            .find(&self.user_id)
            .await
            .map_err(UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::UserNotFound(self.user_id.clone()))?;

        ctx.repos
            .scheduled_notifications
            .find_unsent_by_user(&self.user_id)
            .await
            .map_err(UseCaseError::StorageError)
    }
}
