mod config;
mod locks;
mod repos;
mod services;
mod system;

pub use config::{Config, WebhookSettings};
pub use locks::ActivityLocks;
pub use repos::{
    DeleteResult, IActivityRepo, IChildRepo, IScheduledNotificationRepo, IUserRepo, Repos,
};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};

#[derive(Clone)]
pub struct SchedulerContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub locks: Arc<ActivityLocks>,
    pub notification_sender: Arc<dyn INotificationSender>,
}

impl SchedulerContext {
    async fn create(config: Config) -> anyhow::Result<Self> {
        let repos = match &config.database_url {
            Some(connection_string) => Repos::create_postgres(connection_string).await?,
            None => Repos::create_inmemory(),
        };
        let notification_sender: Arc<dyn INotificationSender> = match &config.notification_webhook
        {
            Some(webhook) => Arc::new(WebhookNotificationSender::new(webhook.clone())?),
            None => Arc::new(LogNotificationSender),
        };
        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            locks: Arc::new(ActivityLocks::new()),
            notification_sender,
        })
    }

    /// Context with in-memory repositories, the real clock and a logging
    /// notification sender
    pub fn create_inmemory(config: Config) -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config,
            sys: Arc::new(RealSys {}),
            locks: Arc::new(ActivityLocks::new()),
            notification_sender: Arc::new(LogNotificationSender),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<SchedulerContext> {
    SchedulerContext::create(Config::new()).await
}
