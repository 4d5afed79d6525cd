use async_trait::async_trait;
use roster_model::prelude::{
    CreateUserRequest, SalaryRequest, UpdateUserRequest, UserId, UserRecord,
};
use std::sync::Arc;

use crate::domains::auth::token::BearerToken;
use crate::errors::ClientResult;
use crate::infra::{
    api_client::ApiClient,
    api_routes::{users, utils},
};

#[async_trait]
pub trait UserAdminService: Send + Sync {
    /// Full directory listing
    async fn list_users(&self) -> ClientResult<Vec<UserRecord>>;

    async fn create_user(
        &self,
        req: &CreateUserRequest,
    ) -> ClientResult<UserRecord>;

    /// Partial update; only the fields present in `req` are sent
    async fn update_user(
        &self,
        user_id: UserId,
        req: &UpdateUserRequest,
    ) -> ClientResult<UserRecord>;

    async fn delete_user(&self, user_id: UserId) -> ClientResult<()>;

    /// Salary writes carry the durable token explicitly
    async fn set_salary(
        &self,
        user_id: UserId,
        req: &SalaryRequest,
        token: &BearerToken,
    ) -> ClientResult<UserRecord>;
}

#[derive(Clone, Debug)]
pub struct UserAdminApiAdapter {
    client: Arc<ApiClient>,
}

impl UserAdminApiAdapter {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserAdminService for UserAdminApiAdapter {
    async fn list_users(&self) -> ClientResult<Vec<UserRecord>> {
        self.client.get(users::COLLECTION).await
    }

    async fn create_user(
        &self,
        req: &CreateUserRequest,
    ) -> ClientResult<UserRecord> {
        self.client.post(users::COLLECTION, req).await
    }

    async fn update_user(
        &self,
        user_id: UserId,
        req: &UpdateUserRequest,
    ) -> ClientResult<UserRecord> {
        self.client.put(&utils::user_item(user_id), req).await
    }

    async fn delete_user(&self, user_id: UserId) -> ClientResult<()> {
        self.client.delete(&utils::user_item(user_id)).await
    }

    async fn set_salary(
        &self,
        user_id: UserId,
        req: &SalaryRequest,
        token: &BearerToken,
    ) -> ClientResult<UserRecord> {
        self.client
            .post_with_token(&utils::user_salary(user_id), req, token)
            .await
    }
}
