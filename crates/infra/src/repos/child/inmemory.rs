use super::IChildRepo;
use crate::repos::shared::inmemory_repo::*;
use activity_scheduler_domain::{Child, ID};

pub struct InMemoryChildRepo {
    children: std::sync::Mutex<Vec<Child>>,
}

impl InMemoryChildRepo {
    pub fn new() -> Self {
        Self {
            children: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IChildRepo for InMemoryChildRepo {
    async fn insert(&self, child: &Child) -> anyhow::Result<()> {
        insert(child, &self.children);
        Ok(())
    }

    async fn delete(&self, child_id: &ID) -> anyhow::Result<Option<Child>> {
        Ok(delete(child_id, &self.children))
    }

    async fn find(&self, child_id: &ID) -> anyhow::Result<Option<Child>> {
        Ok(find(child_id, &self.children))
    }
}
