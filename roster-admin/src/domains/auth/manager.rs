//! Remote login and identity resolution

use log::{debug, info, warn};
use roster_model::prelude::LoginRequest;
use std::sync::Arc;

use super::errors::AuthError;
use super::normalize::normalize;
use super::security::SecureCredential;
use super::state_types::Identity;
use super::token::{BearerToken, TokenHolder};
use crate::domains::user_management::cache::{DirectorySnapshot, DirectorySync};
use crate::errors::{ClientError, ClientResult, ProtocolError, ValidationError};
use crate::infra::services::AuthApi;

/// Display name used when the login email matches no directory record
pub const FALLBACK_DISPLAY_NAME: &str = "Administrator";

/// Result of a successful login: who logged in and the directory fetched
/// while resolving that
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub identity: Identity,
    pub directory: DirectorySnapshot,
}

#[derive(Clone)]
pub struct AuthManager {
    auth_api: Arc<dyn AuthApi>,
    directory: DirectorySync,
    tokens: TokenHolder,
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

/// Trim both inputs and reject either being empty
pub fn validate_credentials(
    email: &str,
    password: &SecureCredential,
) -> Result<(String, SecureCredential), ValidationError> {
    let email = email.trim();
    let password = password.trimmed();
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok((email.to_string(), password))
}

/// 404 means the credentials were not recognized; every other remote
/// failure becomes a generic login failure carrying the server detail.
fn map_login_error(err: ClientError) -> ClientError {
    match err {
        ClientError::Remote(remote) if remote.is_not_found() => {
            AuthError::InvalidCredentials.into()
        }
        ClientError::Remote(remote) => AuthError::LoginFailed {
            status: remote.status,
            detail: remote.detail,
        }
        .into(),
        other => other,
    }
}

fn resolve_identity(
    email: String,
    normalized_email: &str,
    token: BearerToken,
    token_type: Option<String>,
    directory: &DirectorySnapshot,
) -> Identity {
    let matched = directory.find_by_email(normalized_email);
    if matched.is_none() {
        debug!(
            "[AuthManager] No directory record for {}, using placeholder name",
            normalized_email
        );
    }

    Identity {
        token,
        token_type,
        display_name: matched
            .map(|record| record.name.clone())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string()),
        surname: matched.map(|record| record.surname.clone()),
        email,
        role: matched.and_then(|record| record.role),
    }
}

impl AuthManager {
    pub fn new(
        auth_api: Arc<dyn AuthApi>,
        directory: DirectorySync,
        tokens: TokenHolder,
    ) -> Self {
        Self {
            auth_api,
            directory,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenHolder {
        &self.tokens
    }

    /// Exchange credentials for a session.
    ///
    /// On success the token is attached and persisted. If the follow-up
    /// directory fetch fails the token is detached again so that no token
    /// outlives a failed login. `still_current` is consulted once the server
    /// answers; when it returns false the token is never attached and the
    /// login fails with [`AuthError::Superseded`].
    pub async fn login<F>(
        &self,
        email: &str,
        password: &SecureCredential,
        still_current: F,
    ) -> ClientResult<LoginOutcome>
    where
        F: Fn() -> bool + Send + Sync,
    {
        let (email, password) = validate_credentials(email, password)?;
        let normalized_email = normalize(&email);
        info!("[AuthManager] Logging in as {}", normalized_email);

        let request = LoginRequest {
            email: normalized_email.clone(),
            password: password.as_str().to_string(),
        };
        let response = self
            .auth_api
            .login(&request)
            .await
            .map_err(map_login_error)?;

        let token = response
            .access_token
            .filter(|token| !token.trim().is_empty())
            .map(BearerToken::new)
            .ok_or(ProtocolError::MissingToken)?;
        if !still_current() {
            info!("[AuthManager] Login for {} was superseded", normalized_email);
            return Err(AuthError::Superseded.into());
        }
        self.tokens.attach(token.clone()).await;

        let directory = match self.directory.refresh().await {
            Ok(directory) => directory,
            Err(err) => {
                warn!(
                    "[AuthManager] Directory fetch after login failed: {}",
                    err
                );
                self.tokens.detach_if_current(&token).await;
                return Err(map_login_error(err));
            }
        };

        let identity = resolve_identity(
            email,
            &normalized_email,
            token,
            response.token_type,
            &directory,
        );
        Ok(LoginOutcome {
            identity,
            directory,
        })
    }

    /// Drop the token. Never fails.
    pub async fn logout(&self) {
        self.tokens.detach().await;
    }

    /// Detach `token` if a discarded login left it attached
    pub async fn discard_token(&self, token: &BearerToken) {
        if self.tokens.detach_if_current(token).await {
            info!("[AuthManager] Dropped token from a superseded login");
        }
    }
}
