use crate::{
    notification::NotificationSettings,
    shared::entity::{Entity, ID},
};

/// A parent owning `Activity`s and receiving their reminders
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: ID,
    pub name: String,
    pub notification_settings: NotificationSettings,
}

impl User {
    pub fn new(name: &str) -> Self {
        Self {
            id: Default::default(),
            name: name.to_string(),
            notification_settings: Default::default(),
        }
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
