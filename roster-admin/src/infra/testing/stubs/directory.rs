use async_trait::async_trait;
use parking_lot::Mutex;
use roster_model::prelude::{
    CreateUserRequest, LoginRequest, LoginResponse, SalaryRequest,
    UpdateUserRequest, UserId, UserRecord,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::domains::auth::token::BearerToken;
use crate::errors::{ClientError, ClientResult, RemoteError};
use crate::infra::services::{AuthApi, UserAdminService};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StubEndpoint {
    Login,
    ListUsers,
    CreateUser,
    UpdateUser,
    DeleteUser,
    SetSalary,
}

/// A call as the stub received it
#[derive(Debug, Clone, PartialEq)]
pub enum StubCall {
    Login(LoginRequest),
    ListUsers,
    CreateUser(CreateUserRequest),
    UpdateUser(UserId, UpdateUserRequest),
    DeleteUser(UserId),
    SetSalary {
        id: UserId,
        salary: f64,
        token: String,
    },
}

impl StubCall {
    pub fn endpoint(&self) -> StubEndpoint {
        match self {
            StubCall::Login(_) => StubEndpoint::Login,
            StubCall::ListUsers => StubEndpoint::ListUsers,
            StubCall::CreateUser(_) => StubEndpoint::CreateUser,
            StubCall::UpdateUser(_, _) => StubEndpoint::UpdateUser,
            StubCall::DeleteUser(_) => StubEndpoint::DeleteUser,
            StubCall::SetSalary { .. } => StubEndpoint::SetSalary,
        }
    }
}

/// Holds one call at its endpoint until released
#[derive(Debug, Clone, Default)]
pub struct GateHandle {
    arrived: Arc<Notify>,
    release: Arc<Notify>,
}

impl GateHandle {
    /// Resolves once the gated call has been received
    pub async fn arrived(&self) {
        self.arrived.notified().await;
    }

    /// Let the gated call proceed
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[derive(Debug, Default)]
struct InnerDirectoryState {
    users: Vec<UserRecord>,
    accounts: HashMap<String, String>,
    login_response: Option<LoginResponse>,
    failures: HashMap<StubEndpoint, VecDeque<ClientError>>,
    gates: HashMap<StubEndpoint, GateHandle>,
    calls: Vec<StubCall>,
    issued_tokens: u64,
}

/// In-memory directory server implementing both service traits
///
/// Records every call, can script failures per endpoint and can hold a call
/// open with a [`GateHandle`] to interleave operations deterministically.
#[derive(Debug, Clone, Default)]
pub struct StubDirectoryServer {
    inner: Arc<Mutex<InnerDirectoryState>>,
}

fn not_found() -> ClientError {
    RemoteError::new(404, Some("User not found.".to_string())).into()
}

impl StubDirectoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(self, users: Vec<UserRecord>) -> Self {
        self.inner.lock().users = users;
        self
    }

    /// Accept `email`/`password` at the login endpoint
    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.inner
            .lock()
            .accounts
            .insert(email.to_string(), password.to_string());
        self
    }

    /// Answer every successful login with `response` instead of a token
    pub fn with_login_response(self, response: LoginResponse) -> Self {
        self.inner.lock().login_response = Some(response);
        self
    }

    /// Fail the next call to `endpoint` with `error`
    pub fn fail_next(&self, endpoint: StubEndpoint, error: impl Into<ClientError>) {
        self.inner
            .lock()
            .failures
            .entry(endpoint)
            .or_default()
            .push_back(error.into());
    }

    /// Hold the next call to `endpoint` until the handle is released
    pub fn gate(&self, endpoint: StubEndpoint) -> GateHandle {
        let handle = GateHandle::default();
        self.inner.lock().gates.insert(endpoint, handle.clone());
        handle
    }

    pub fn calls(&self) -> Vec<StubCall> {
        self.inner.lock().calls.clone()
    }

    pub fn calls_to(&self, endpoint: StubEndpoint) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|call| call.endpoint() == endpoint)
            .count()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    pub fn users(&self) -> Vec<UserRecord> {
        self.inner.lock().users.clone()
    }

    /// Record the call, wait at its gate, then apply any scripted failure
    async fn enter(&self, call: StubCall) -> ClientResult<()> {
        let endpoint = call.endpoint();
        let gate = {
            let mut inner = self.inner.lock();
            inner.calls.push(call);
            inner.gates.remove(&endpoint)
        };

        if let Some(gate) = gate {
            gate.arrived.notify_one();
            gate.release.notified().await;
        }

        let failure = self
            .inner
            .lock()
            .failures
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front);
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AuthApi for StubDirectoryServer {
    async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        self.enter(StubCall::Login(request.clone())).await?;

        let mut inner = self.inner.lock();
        match inner.accounts.get(&request.email) {
            None => return Err(not_found()),
            Some(password) if *password != request.password => {
                return Err(RemoteError::new(
                    401,
                    Some("Invalid email or password.".to_string()),
                )
                .into());
            }
            Some(_) => {}
        }

        if let Some(response) = inner.login_response.clone() {
            return Ok(response);
        }
        inner.issued_tokens += 1;
        Ok(LoginResponse {
            access_token: Some(format!("token-{}", inner.issued_tokens)),
            token_type: Some("bearer".to_string()),
        })
    }
}

#[async_trait]
impl UserAdminService for StubDirectoryServer {
    /// The listing reflects the directory when the request arrived, even if
    /// the call is held at a gate
    async fn list_users(&self) -> ClientResult<Vec<UserRecord>> {
        let users = self.inner.lock().users.clone();
        self.enter(StubCall::ListUsers).await?;
        Ok(users)
    }

    async fn create_user(
        &self,
        req: &CreateUserRequest,
    ) -> ClientResult<UserRecord> {
        self.enter(StubCall::CreateUser(req.clone())).await?;

        let mut inner = self.inner.lock();
        if inner.users.iter().any(|user| user.email == req.email) {
            return Err(RemoteError::new(
                400,
                Some("Email already registered.".to_string()),
            )
            .into());
        }
        let next_id = inner.users.iter().map(|user| user.id.0).max().unwrap_or(0) + 1;
        let record = UserRecord {
            id: UserId(next_id),
            name: req.name.clone(),
            surname: req.surname.clone(),
            email: req.email.clone(),
            phone: req.phone.clone(),
            role: Some(req.role),
            salary: None,
            is_active: Some(true),
        };
        inner.users.push(record.clone());
        Ok(record)
    }

    async fn update_user(
        &self,
        user_id: UserId,
        req: &UpdateUserRequest,
    ) -> ClientResult<UserRecord> {
        self.enter(StubCall::UpdateUser(user_id, req.clone())).await?;

        let mut inner = self.inner.lock();
        let record = inner
            .users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(not_found)?;
        if let Some(name) = &req.name {
            record.name = name.clone();
        }
        if let Some(surname) = &req.surname {
            record.surname = surname.clone();
        }
        if let Some(email) = &req.email {
            record.email = email.clone();
        }
        if let Some(phone) = &req.phone {
            record.phone = Some(phone.clone());
        }
        if let Some(role) = req.role {
            record.role = Some(role);
        }
        Ok(record.clone())
    }

    async fn delete_user(&self, user_id: UserId) -> ClientResult<()> {
        self.enter(StubCall::DeleteUser(user_id)).await?;

        let mut inner = self.inner.lock();
        let before = inner.users.len();
        inner.users.retain(|user| user.id != user_id);
        if inner.users.len() == before {
            return Err(not_found());
        }
        Ok(())
    }

    async fn set_salary(
        &self,
        user_id: UserId,
        req: &SalaryRequest,
        token: &BearerToken,
    ) -> ClientResult<UserRecord> {
        self.enter(StubCall::SetSalary {
            id: user_id,
            salary: req.salary,
            token: token.as_str().to_string(),
        })
        .await?;

        let mut inner = self.inner.lock();
        let record = inner
            .users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(not_found)?;
        record.salary = Some(req.salary);
        Ok(record.clone())
    }
}
