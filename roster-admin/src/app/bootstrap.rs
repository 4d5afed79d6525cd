use anyhow::Context;
use roster_model::prelude::{Role, UserId, UserRecord};
use std::sync::Arc;

use crate::domains::auth::storage::{DurableStore, FileStore, MemoryStore};
use crate::domains::auth::token::TokenHolder;
use crate::infra::api_client::ApiClient;
use crate::infra::config::Config;
use crate::infra::services::{AuthApiAdapter, UserAdminApiAdapter};
use crate::infra::testing::stubs::StubDirectoryServer;
use crate::orchestrator::Orchestrator;

pub const DEMO_EMAIL: &str = "admin@example.com";
pub const DEMO_PASSWORD: &str = "admin";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub config: Config,
    /// Keep the token in memory only
    pub ephemeral: bool,
    /// Serve the directory from an in-process stub instead of the network
    pub use_test_stubs: bool,
}

impl AppConfig {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ephemeral: false,
            use_test_stubs: false,
        }
    }

    pub fn from_environment() -> Self {
        Self::new(Config::load())
    }

    pub fn server_url(&self) -> &str {
        &self.config.server_url
    }

    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.config.server_url = server_url.into();
        self
    }

    pub fn with_ephemeral(mut self, enabled: bool) -> Self {
        self.ephemeral = enabled;
        self
    }

    pub fn with_test_stubs(mut self, enabled: bool) -> Self {
        self.use_test_stubs = enabled;
        self
    }

    fn token_store(&self) -> anyhow::Result<Arc<dyn DurableStore>> {
        if self.ephemeral || self.use_test_stubs {
            return Ok(Arc::new(MemoryStore::new()));
        }
        let path = self
            .config
            .resolved_token_store_path()
            .context("Unable to locate the token store")?;
        log::debug!("[Bootstrap] Token store at {}", path.display());
        Ok(Arc::new(FileStore::new(path)))
    }
}

/// Directory served when running against stubs
fn demo_directory() -> StubDirectoryServer {
    StubDirectoryServer::new()
        .with_account(DEMO_EMAIL, DEMO_PASSWORD)
        .with_users(vec![
            UserRecord {
                id: UserId(1),
                name: "Demo".into(),
                surname: "Admin".into(),
                email: DEMO_EMAIL.into(),
                phone: None,
                role: Some(Role::Admin),
                salary: Some(5000.0),
                is_active: Some(true),
            },
            UserRecord {
                id: UserId(2),
                name: "Deniz".into(),
                surname: "Sahin".into(),
                email: "deniz@example.com".into(),
                phone: Some("555 0102".into()),
                role: Some(Role::User),
                salary: None,
                is_active: Some(true),
            },
        ])
}

/// Wire the orchestrator for `config`
pub fn build_orchestrator(config: &AppConfig) -> anyhow::Result<Arc<Orchestrator>> {
    let tokens = TokenHolder::new(config.token_store()?);

    if config.use_test_stubs {
        log::warn!("[Bootstrap] Using the in-process demo directory");
        let stub = Arc::new(demo_directory());
        return Ok(Arc::new(Orchestrator::from_services(
            stub.clone(),
            stub,
            tokens,
        )));
    }

    let client = Arc::new(
        ApiClient::new(
            config.server_url(),
            config.config.request_timeout(),
            tokens.clone(),
        )
        .context("Failed to create HTTP client")?,
    );
    let auth_api = Arc::new(AuthApiAdapter::new(client.clone()));
    let users = Arc::new(UserAdminApiAdapter::new(client));

    Ok(Arc::new(Orchestrator::from_services(auth_api, users, tokens)))
}
