use super::IActivityRepo;
use crate::repos::shared::inmemory_repo::*;
use activity_scheduler_domain::{Activity, ID};

pub struct InMemoryActivityRepo {
    activities: std::sync::Mutex<Vec<Activity>>,
}

impl InMemoryActivityRepo {
    pub fn new() -> Self {
        Self {
            activities: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IActivityRepo for InMemoryActivityRepo {
    async fn insert(&self, activity: &Activity) -> anyhow::Result<()> {
        insert(activity, &self.activities);
        Ok(())
    }

    async fn save(&self, activity: &Activity) -> anyhow::Result<()> {
        save(activity, &self.activities);
        Ok(())
    }

    async fn delete(&self, activity_id: &ID) -> anyhow::Result<Option<Activity>> {
        Ok(delete(activity_id, &self.activities))
    }

    async fn find(&self, activity_id: &ID) -> anyhow::Result<Option<Activity>> {
        Ok(find(activity_id, &self.activities))
    }

    async fn find_all_ids(&self) -> anyhow::Result<Vec<ID>> {
        Ok(find_by(&self.activities, |_| true)
            .into_iter()
            .map(|activity| activity.id)
            .collect())
    }
}
