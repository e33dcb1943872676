//! Users service (`/users`)

use std::sync::Arc;

use async_trait::async_trait;
use shared::{User, UserForm, UserSearch, UserUpdate};

use super::{CollectionApi, Operation, Resource, classify, require_id};
use crate::error::ServiceResult;
use crate::http::{HttpClient, NetworkHttpClient};

/// User helpers built on the collection endpoints
#[async_trait]
pub trait UserApi: CollectionApi<User> {
    /// `true` when no other user already has `username` (case-insensitive).
    /// `exclude_id` skips the user being edited. If the list can't be
    /// fetched the name is reported available and the backend decides.
    async fn username_available(&self, username: &str, exclude_id: Option<&str>) -> bool {
        match self.list().await {
            Ok(users) => !users
                .iter()
                .any(|u| u.has_username(username) && Some(u.id_user.as_str()) != exclude_id),
            Err(e) => {
                tracing::warn!(error = %e, "Username check skipped, user list unavailable");
                true
            }
        }
    }

    /// Client-side search over the full list
    async fn search(&self, filters: &UserSearch) -> ServiceResult<Vec<User>> {
        let users = self.list().await?;
        Ok(users.into_iter().filter(|u| filters.matches(u)).collect())
    }
}

pub struct UsersService<C = NetworkHttpClient> {
    http: Arc<C>,
}

impl<C: HttpClient> UsersService<C> {
    pub fn new(http: Arc<C>) -> Self {
        Self { http }
    }
}

const RESOURCE: Resource = Resource::Users;

#[async_trait]
impl<C: HttpClient + 'static> CollectionApi<User> for UsersService<C> {
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> ServiceResult<Vec<User>> {
        self.http
            .get("users")
            .await
            .map_err(|e| classify(e, RESOURCE, Operation::List))
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: &str) -> ServiceResult<User> {
        let id = require_id(id, RESOURCE)?;
        self.http
            .get(&format!("users/{}", id))
            .await
            .map_err(|e| classify(e, RESOURCE, Operation::Get))
    }

    #[tracing::instrument(skip_all, fields(username = %data.username))]
    async fn create(&self, data: UserForm) -> ServiceResult<User> {
        self.http
            .post("users/register", &data)
            .await
            .map_err(|e| classify(e, RESOURCE, Operation::Create))
    }

    #[tracing::instrument(skip(self, data))]
    async fn update(&self, id: &str, data: UserUpdate) -> ServiceResult<User> {
        let id = require_id(id, RESOURCE)?;
        self.http
            .put(&format!("users/{}", id), &data)
            .await
            .map_err(|e| classify(e, RESOURCE, Operation::Update))
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &str) -> ServiceResult<()> {
        let id = require_id(id, RESOURCE)?;
        self.http
            .delete(&format!("users/{}", id))
            .await
            .map_err(|e| classify(e, RESOURCE, Operation::Delete))
    }
}

impl<C: HttpClient + 'static> UserApi for UsersService<C> {}
