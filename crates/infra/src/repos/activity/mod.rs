mod inmemory;
mod postgres;

use activity_scheduler_domain::{Activity, ID};
pub use inmemory::InMemoryActivityRepo;
pub use postgres::PostgresActivityRepo;

#[async_trait::async_trait]
pub trait IActivityRepo: Send + Sync {
    async fn insert(&self, activity: &Activity) -> anyhow::Result<()>;
    async fn save(&self, activity: &Activity) -> anyhow::Result<()>;
    async fn delete(&self, activity_id: &ID) -> anyhow::Result<Option<Activity>>;
    async fn find(&self, activity_id: &ID) -> anyhow::Result<Option<Activity>>;
    async fn find_all_ids(&self) -> anyhow::Result<Vec<ID>>;
}
