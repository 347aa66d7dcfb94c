mod activity;
mod child;
mod scheduled_notification;
mod shared;
mod user;

pub use activity::IActivityRepo;
use activity::{InMemoryActivityRepo, PostgresActivityRepo};
pub use child::IChildRepo;
use child::{InMemoryChildRepo, PostgresChildRepo};
pub use scheduled_notification::IScheduledNotificationRepo;
use scheduled_notification::{
    InMemoryScheduledNotificationRepo, PostgresScheduledNotificationRepo,
};
pub use shared::repo::DeleteResult;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
pub use user::IUserRepo;
use user::{InMemoryUserRepo, PostgresUserRepo};

#[derive(Clone)]
pub struct Repos {
    pub activities: Arc<dyn IActivityRepo>,
    pub users: Arc<dyn IUserRepo>,
    pub children: Arc<dyn IChildRepo>,
    pub scheduled_notifications: Arc<dyn IScheduledNotificationRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        info!("DB RUNNING MIGRATIONS ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB RUNNING MIGRATIONS ... [done]");

        Ok(Self {
            activities: Arc::new(PostgresActivityRepo::new(pool.clone())),
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            children: Arc::new(PostgresChildRepo::new(pool.clone())),
            scheduled_notifications: Arc::new(PostgresScheduledNotificationRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            activities: Arc::new(InMemoryActivityRepo::new()),
            users: Arc::new(InMemoryUserRepo::new()),
            children: Arc::new(InMemoryChildRepo::new()),
            scheduled_notifications: Arc::new(InMemoryScheduledNotificationRepo::new()),
        }
    }
}
