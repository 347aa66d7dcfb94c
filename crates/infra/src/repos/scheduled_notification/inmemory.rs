use super::IScheduledNotificationRepo;
use crate::repos::shared::{inmemory_repo::*, repo::DeleteResult};
use activity_scheduler_domain::{ScheduledNotification, ID};
use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Mutex};

pub struct InMemoryScheduledNotificationRepo {
    notifications: Mutex<Vec<ScheduledNotification>>,
    versions: Mutex<HashMap<ID, i64>>,
}

impl InMemoryScheduledNotificationRepo {
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(vec![]),
            versions: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl IScheduledNotificationRepo for InMemoryScheduledNotificationRepo {
    async fn bulk_insert(&self, notifications: &[ScheduledNotification]) -> anyhow::Result<()> {
        for notification in notifications {
            insert(notification, &self.notifications);
        }
        Ok(())
    }

    async fn bulk_insert_if_version(
        &self,
        activity_id: &ID,
        version: i64,
        notifications: &[ScheduledNotification],
    ) -> anyhow::Result<bool> {
        // Held until inserted so that no version bump can happen in between
        let versions = self.versions.lock().unwrap();
        if versions.get(activity_id) != Some(&version) {
            return Ok(false);
        }
        for notification in notifications {
            insert(notification, &self.notifications);
        }
        drop(versions);
        Ok(true)
    }

    async fn find_by_activity(
        &self,
        activity_id: &ID,
    ) -> anyhow::Result<Vec<ScheduledNotification>> {
        Ok(find_by(&self.notifications, |n| n.activity_id == *activity_id))
    }

    async fn find_unsent_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<ScheduledNotification>> {
        let mut notifications = find_by(&self.notifications, |n| n.user_id == *user_id && !n.sent);
        notifications.sort_by_key(|n| n.scheduled_for);
        Ok(notifications)
    }

    async fn claim_due(
        &self,
        before_inc: DateTime<Utc>,
    ) -> anyhow::Result<Vec<ScheduledNotification>> {
        let mut notifications = self.notifications.lock().unwrap();
        let mut claimed = Vec::new();
        for n in notifications.iter_mut() {
            if !n.sent && n.scheduled_for <= before_inc {
                n.sent = true;
                claimed.push(n.clone());
            }
        }
        claimed.sort_by_key(|n| n.scheduled_for);
        Ok(claimed)
    }

    async fn release_claimed(&self, notification_ids: &[ID]) -> anyhow::Result<u64> {
        let updated = update_many(
            &self.notifications,
            |n| n.sent && notification_ids.contains(&n.id),
            |n| n.sent = false,
        );
        Ok(updated as u64)
    }

    async fn delete_unsent_by_activity(&self, activity_id: &ID) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.notifications, |n| {
            n.activity_id == *activity_id && !n.sent
        }))
    }

    async fn inc_version(&self, activity_id: &ID) -> anyhow::Result<i64> {
        let mut versions = self.versions.lock().unwrap();
        let version = versions.entry(activity_id.clone()).or_insert(0);
        *version += 1;
        Ok(*version)
    }
}
