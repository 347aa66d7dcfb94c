mod inmemory;
mod postgres;

use super::shared::repo::DeleteResult;
use activity_scheduler_domain::{ScheduledNotification, ID};
use chrono::{DateTime, Utc};
pub use inmemory::InMemoryScheduledNotificationRepo;
pub use postgres::PostgresScheduledNotificationRepo;

#[async_trait::async_trait]
pub trait IScheduledNotificationRepo: Send + Sync {
    async fn bulk_insert(&self, notifications: &[ScheduledNotification]) -> anyhow::Result<()>;
    /// Inserts the notifications of an `Activity` only if its reminder version
    /// is still `version`, checked and inserted atomically. Returns whether
    /// they were inserted.
    async fn bulk_insert_if_version(
        &self,
        activity_id: &ID,
        version: i64,
        notifications: &[ScheduledNotification],
    ) -> anyhow::Result<bool>;
    async fn find_by_activity(&self, activity_id: &ID)
        -> anyhow::Result<Vec<ScheduledNotification>>;
    /// Unsent notifications of a `User`, earliest `scheduled_for` first
    async fn find_unsent_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<ScheduledNotification>>;
    /// Marks every unsent notification with `scheduled_for <= before_inc` as
    /// sent and returns them. A notification is claimed by one caller only.
    async fn claim_due(&self, before_inc: DateTime<Utc>)
        -> anyhow::Result<Vec<ScheduledNotification>>;
    /// Marks claimed notifications that could not be delivered as unsent again
    async fn release_claimed(&self, notification_ids: &[ID]) -> anyhow::Result<u64>;
    /// Deletes the unsent notifications of an `Activity`. Sent ones are kept.
    async fn delete_unsent_by_activity(&self, activity_id: &ID) -> anyhow::Result<DeleteResult>;
    /// Bumps the reminder version of an `Activity` and returns the new version
    async fn inc_version(&self, activity_id: &ID) -> anyhow::Result<i64>;
}
