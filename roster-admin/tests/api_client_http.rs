//! The HTTP adapters against an in-process directory server

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{post, put},
};
use parking_lot::Mutex;
use roster_admin::domains::auth::security::SecureCredential;
use roster_admin::domains::auth::storage::{DurableStore, FileStore, TOKEN_KEY};
use roster_admin::domains::auth::token::{BearerToken, TokenHolder};
use roster_admin::domains::ui::feedback::FeedbackState;
use roster_admin::errors::{ClientError, RemoteError};
use roster_admin::infra::api_client::ApiClient;
use roster_admin::infra::services::{
    AuthApi, AuthApiAdapter, UserAdminApiAdapter, UserAdminService,
};
use roster_admin::orchestrator::Orchestrator;
use roster_model::prelude::{
    CreateUserRequest, LoginRequest, Role, SalaryRequest, UpdateUserRequest, UserId,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const TOKEN: &str = "abc123";

#[derive(Clone, Default)]
struct ServerLog {
    requests: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

impl ServerLog {
    fn record(&self, route: &str, headers: &HeaderMap, body: Value) {
        let auth = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.requests.lock().push((route.to_string(), auth, body));
    }

    fn entries(&self) -> Vec<(String, Option<String>, Value)> {
        self.requests.lock().clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some(&format!("Bearer {TOKEN}"))
}

fn user_json(id: i64, name: &str, email: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "surname": "Test",
        "email": email,
        "phone": null,
        "role": "admin",
        "is_active": true
    })
}

async fn login(
    State(log): State<ServerLog>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    log.record("login", &headers, body.clone());
    if body["email"] == "admin@example.com" && body["password"] == "pw" {
        (
            StatusCode::OK,
            Json(json!({"access_token": TOKEN, "token_type": "bearer"})),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "User not found."})),
        )
    }
}

async fn list_users(
    State(log): State<ServerLog>,
    headers: HeaderMap,
) -> impl IntoResponse {
    log.record("list", &headers, Value::Null);
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token invalid."})),
        );
    }
    (
        StatusCode::OK,
        Json(json!([
            user_json(1, "Ada", "Admin@Example.com"),
            user_json(2, "Bora", "bora@example.com"),
        ])),
    )
}

async fn create_user(
    State(log): State<ServerLog>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    log.record("create", &headers, body.clone());
    if body["email"] == "ada@example.com" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "email exists"})),
        );
    }
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"detail": [{"loc": ["body", "email"], "msg": "invalid"}]})),
    )
}

async fn update_user(
    State(log): State<ServerLog>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    log.record(&format!("update {id}"), &headers, body);
    Json(user_json(id, "Bora", "bora@example.com"))
}

async fn delete_user(
    State(log): State<ServerLog>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> StatusCode {
    log.record(&format!("delete {id}"), &headers, Value::Null);
    StatusCode::NO_CONTENT
}

async fn set_salary(
    State(log): State<ServerLog>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    log.record(&format!("salary {id}"), &headers, body);
    let mut user = user_json(id, "Bora", "bora@example.com");
    user["salary"] = json!(1500.0);
    Json(user)
}

async fn spawn_server() -> (String, ServerLog) {
    let log = ServerLog::default();
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/users/", post(create_user).get(list_users))
        .route("/users/{id}", put(update_user).delete(delete_user))
        .route("/users/{id}/salary", post(set_salary))
        .with_state(log.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    // base URL without scheme exercises normalization
    (format!("{}/", addr), log)
}

fn adapters(
    base_url: &str,
    store: Arc<dyn DurableStore>,
) -> (AuthApiAdapter, UserAdminApiAdapter, TokenHolder) {
    let tokens = TokenHolder::new(store);
    let client = Arc::new(
        ApiClient::new(base_url, Duration::from_secs(5), tokens.clone()).unwrap(),
    );
    (
        AuthApiAdapter::new(client.clone()),
        UserAdminApiAdapter::new(client),
        tokens,
    )
}

#[tokio::test]
async fn login_is_sent_without_authorization_and_others_with_it() {
    let (base_url, log) = spawn_server().await;
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileStore::new(temp_dir.path().join("session.json")));
    let (auth, users, tokens) = adapters(&base_url, store.clone());

    let response = auth
        .login(&LoginRequest {
            email: "admin@example.com".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();
    assert_eq!(response.access_token.as_deref(), Some(TOKEN));

    // unauthenticated list is rejected with the server detail
    let err = users.list_users().await.unwrap_err();
    assert_eq!(
        err,
        ClientError::Remote(RemoteError::new(401, Some("Token invalid.".into())))
    );

    tokens.attach(BearerToken::new(TOKEN)).await;
    let listed = users.list_users().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].role, Some(Role::Admin));
    assert_eq!(
        store.get_item(TOKEN_KEY).await.unwrap().as_deref(),
        Some(TOKEN)
    );

    let entries = log.entries();
    assert_eq!(entries[0].0, "login");
    assert_eq!(entries[0].1, None);
    assert_eq!(entries[2].1.as_deref(), Some("Bearer abc123"));
}

#[tokio::test]
async fn mutations_use_the_expected_routes_and_bodies() {
    let (base_url, log) = spawn_server().await;
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileStore::new(temp_dir.path().join("session.json")));
    let (_, users, tokens) = adapters(&base_url, store);
    tokens.attach(BearerToken::new(TOKEN)).await;

    users
        .update_user(UserId(2), &UpdateUserRequest::role_only(Role::User))
        .await
        .unwrap();
    users.delete_user(UserId(2)).await.unwrap();
    let updated = users
        .set_salary(
            UserId(2),
            &SalaryRequest { salary: 1500.0 },
            &BearerToken::new("explicit"),
        )
        .await
        .unwrap();
    assert_eq!(updated.salary, Some(1500.0));

    let entries = log.entries();
    assert_eq!(entries[0].0, "update 2");
    assert_eq!(entries[0].2, json!({"role": "user"}));
    assert_eq!(entries[1].0, "delete 2");
    assert_eq!(entries[2].0, "salary 2");
    assert_eq!(entries[2].1.as_deref(), Some("Bearer explicit"));
    assert_eq!(entries[2].2, json!({"salary": 1500.0}));
}

#[tokio::test]
async fn error_details_are_only_taken_from_strings() {
    let (base_url, _) = spawn_server().await;
    let temp_dir = TempDir::new().unwrap();
    let (_, users, _) =
        adapters(&base_url, Arc::new(FileStore::new(temp_dir.path().join("s.json"))));

    let request = |email: &str| CreateUserRequest {
        name: "Ada".into(),
        surname: "Test".into(),
        email: email.into(),
        phone: None,
        password: "pw".into(),
        role: Role::User,
    };

    let err = users.create_user(&request("ada@example.com")).await.unwrap_err();
    assert_eq!(err.detail(), Some("email exists"));
    assert_eq!(err.status(), Some(400));

    let err = users.create_user(&request("not-an-email")).await.unwrap_err();
    assert_eq!(err.detail(), None);
    assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn orchestrated_session_over_http() {
    let (base_url, _) = spawn_server().await;
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");
    let (auth, users, tokens) = adapters(&base_url, Arc::new(FileStore::new(&path)));
    let orchestrator =
        Orchestrator::from_services(Arc::new(auth), Arc::new(users), tokens.clone());

    assert!(
        !orchestrator
            .login("nobody@example.com", &SecureCredential::from("pw"))
            .await
    );
    assert!(orchestrator.snapshot().feedback.is_error());

    assert!(
        orchestrator
            .login(" admin@example.com ", &SecureCredential::from("pw"))
            .await
    );
    let view = orchestrator.snapshot();
    assert_eq!(view.identity.unwrap().display_name, "Ada");
    assert_eq!(view.users.len(), 2);
    assert_eq!(view.feedback, FeedbackState::None);
    assert!(path.exists());

    orchestrator.logout().await;
    assert!(!path.exists());
    assert!(tokens.current().is_none());
}
