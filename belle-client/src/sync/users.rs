//! Users store

use shared::{User, UserSearch};

use super::entity::EntityStore;
use crate::error::ServiceResult;
use crate::services::UserApi;

pub type UsersStore = EntityStore<User, dyn UserApi>;

impl<A: UserApi + ?Sized> EntityStore<User, A> {
    /// `true` when `username` is free; `exclude_id` is the user being edited
    pub async fn validate_username(&self, username: &str, exclude_id: Option<&str>) -> bool {
        self.api().username_available(username, exclude_id).await
    }

    pub async fn search(&self, filters: &UserSearch) -> ServiceResult<Vec<User>> {
        self.query(self.api().search(filters)).await
    }

    pub async fn get_by_id(&self, id: &str) -> Option<User> {
        self.get(id).await
    }
}
