mod inmemory;
mod postgres;

use activity_scheduler_domain::{Child, ID};
pub use inmemory::InMemoryChildRepo;
pub use postgres::PostgresChildRepo;

#[async_trait::async_trait]
pub trait IChildRepo: Send + Sync {
    async fn insert(&self, child: &Child) -> anyhow::Result<()>;
    async fn delete(&self, child_id: &ID) -> anyhow::Result<Option<Child>>;
    async fn find(&self, child_id: &ID) -> anyhow::Result<Option<Child>>;
}
