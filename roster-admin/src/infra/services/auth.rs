use async_trait::async_trait;
use roster_model::prelude::{LoginRequest, LoginResponse};
use std::sync::Arc;

use crate::errors::ClientResult;
use crate::infra::{api_client::ApiClient, api_routes::auth};

/// Credential exchange against the directory server
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a token. Never sends a bearer header.
    async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse>;
}

#[derive(Clone, Debug)]
pub struct AuthApiAdapter {
    client: Arc<ApiClient>,
}

impl AuthApiAdapter {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthApi for AuthApiAdapter {
    async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        self.client.post_public(auth::LOGIN, request).await
    }
}
