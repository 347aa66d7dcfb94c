use crate::config::WebhookSettings;
use activity_scheduler_domain::ScheduledNotification;
use std::time::Duration;
use tracing::info;

const WEBHOOK_TIMEOUT_SECS: u64 = 10;

/// Delivers a due `ScheduledNotification` to its `User`
#[async_trait::async_trait]
pub trait INotificationSender: Send + Sync {
    async fn send(&self, notification: &ScheduledNotification) -> anyhow::Result<()>;
}

/// Posts notifications as json to a webhook
pub struct WebhookNotificationSender {
    client: reqwest::Client,
    webhook: WebhookSettings,
}

impl WebhookNotificationSender {
    pub fn new(webhook: WebhookSettings) -> anyhow::Result<Self> {
        Self::with_timeout(webhook, Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
    }

    /// A delivery fails when the webhook has not responded within `timeout`
    pub fn with_timeout(webhook: WebhookSettings, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, webhook })
    }
}

#[async_trait::async_trait]
impl INotificationSender for WebhookNotificationSender {
    async fn send(&self, notification: &ScheduledNotification) -> anyhow::Result<()> {
        self.client
            .post(&self.webhook.url)
            .header("activity-scheduler-webhook-key", &self.webhook.key)
            .json(notification)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Used when no webhook is configured
pub struct LogNotificationSender;

#[async_trait::async_trait]
impl INotificationSender for LogNotificationSender {
    async fn send(&self, notification: &ScheduledNotification) -> anyhow::Result<()> {
        info!(
            user_id = %notification.user_id,
            activity_id = %notification.activity_id,
            kind = %notification.kind,
            "Reminder: {} for {} starts at {} ({})",
            notification.activity_title,
            notification.child_name,
            notification.activity_start,
            notification.location
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use activity_scheduler_domain::{Activity, Child, NotificationKind, User};
    use chrono::{TimeZone, Utc};

    fn notification() -> ScheduledNotification {
        let user = User::new("Kari");
        let child = Child::new(&user.id, "Ola");
        let activity = Activity::new(
            &user.id,
            &child.id,
            "Football",
            vec![1],
            "09:00".parse().unwrap(),
            "10:00".parse().unwrap(),
        );
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        ScheduledNotification::new(
            &activity,
            &child,
            start,
            NotificationKind::OneHour,
            start - chrono::Duration::hours(1),
            start - chrono::Duration::hours(2),
        )
    }

    #[tokio::test]
    async fn webhook_that_never_responds_times_out() {
        // Connections are accepted by the OS backlog but never answered
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let sender = WebhookNotificationSender::with_timeout(
            WebhookSettings {
                url: format!("http://{}/reminders", addr),
                key: "secret".into(),
            },
            Duration::from_millis(200),
        )
        .unwrap();

        let res = tokio::time::timeout(Duration::from_secs(5), sender.send(&notification()))
            .await
            .expect("Delivery to give up before the outer timeout");
        assert!(res.is_err());
        drop(listener);
    }
}
