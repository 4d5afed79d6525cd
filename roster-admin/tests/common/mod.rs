//! Fixtures shared by the orchestrator integration tests

#![allow(dead_code)]

use roster_admin::domains::auth::security::SecureCredential;
use roster_admin::domains::auth::storage::MemoryStore;
use roster_admin::domains::auth::token::TokenHolder;
use roster_admin::infra::testing::stubs::StubDirectoryServer;
use roster_admin::orchestrator::Orchestrator;
use roster_model::prelude::{Role, UserId, UserRecord};
use std::sync::Arc;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "s3cret";

pub fn record(id: i64, name: &str, email: &str, role: Option<Role>) -> UserRecord {
    UserRecord {
        id: UserId(id),
        name: name.to_string(),
        surname: "Test".to_string(),
        email: email.to_string(),
        phone: None,
        role,
        salary: None,
        is_active: Some(true),
    }
}

pub fn directory() -> Vec<UserRecord> {
    vec![
        record(1, "Ada", ADMIN_EMAIL, Some(Role::Admin)),
        record(7, "Arda", "arda@example.com", Some(Role::User)),
        record(9, "Nil", "nil@example.com", None),
    ]
}

pub struct Harness {
    pub orchestrator: Arc<Orchestrator>,
    pub server: StubDirectoryServer,
    pub tokens: TokenHolder,
    pub store: Arc<MemoryStore>,
}

pub fn harness_with(server: StubDirectoryServer) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let tokens = TokenHolder::new(store.clone());
    let stub = Arc::new(server.clone());
    let orchestrator = Arc::new(Orchestrator::from_services(
        stub.clone(),
        stub,
        tokens.clone(),
    ));
    Harness {
        orchestrator,
        server,
        tokens,
        store,
    }
}

pub fn harness() -> Harness {
    harness_with(
        StubDirectoryServer::new()
            .with_account(ADMIN_EMAIL, ADMIN_PASSWORD)
            .with_users(directory()),
    )
}

/// Harness with a completed login and the call log cleared
pub async fn logged_in() -> Harness {
    let harness = harness();
    assert!(
        harness
            .orchestrator
            .login(ADMIN_EMAIL, &SecureCredential::from(ADMIN_PASSWORD))
            .await
    );
    harness.server.clear_calls();
    harness
}
