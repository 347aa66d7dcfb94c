use crate::shared::entity::{Entity, ID};

#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    pub id: ID,
    pub user_id: ID,
    pub name: String,
}

impl Child {
    pub fn new(user_id: &ID, name: &str) -> Self {
        Self {
            id: Default::default(),
            user_id: user_id.clone(),
            name: name.to_string(),
        }
    }
}

impl Entity for Child {
    fn id(&self) -> &ID {
        &self.id
    }
}
