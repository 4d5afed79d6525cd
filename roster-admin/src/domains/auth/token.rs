//! Bearer token custody
//!
//! [`TokenHolder`] is the single place the session token is attached or
//! detached. The HTTP client reads it to build `Authorization` headers and
//! the durable copy is mirrored to a [`DurableStore`] under
//! [`TOKEN_KEY`].

use log::{debug, warn};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use super::security::SecureCredential;
use super::storage::{DurableStore, TOKEN_KEY};

/// Opaque bearer token issued by the login endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(SecureCredential);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecureCredential::new(token.into()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Value for the `Authorization` header
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0.as_str())
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken").field(&"[REDACTED]").finish()
    }
}

#[derive(Clone)]
pub struct TokenHolder {
    current: Arc<RwLock<Option<BearerToken>>>,
    store: Arc<dyn DurableStore>,
}

impl fmt::Debug for TokenHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenHolder")
            .field("has_token", &self.is_attached())
            .field("store", &self.store)
            .finish()
    }
}

impl TokenHolder {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            store,
        }
    }

    /// Attach a token to all subsequent outbound calls and persist it.
    ///
    /// Persistence failures are logged; the in-memory token stays attached.
    pub async fn attach(&self, token: BearerToken) {
        *self.current.write() = Some(token.clone());
        if let Err(e) = self.store.set_item(TOKEN_KEY, token.as_str()).await {
            warn!("[TokenHolder] Failed to persist session token: {}", e);
        } else {
            debug!("[TokenHolder] Session token attached");
        }
    }

    /// Stop attaching the token and erase the durable copy. Idempotent.
    pub async fn detach(&self) {
        let previous = self.current.write().take();
        if let Err(e) = self.store.remove_item(TOKEN_KEY).await {
            warn!("[TokenHolder] Failed to erase persisted token: {}", e);
        }
        if previous.is_some() {
            debug!("[TokenHolder] Session token detached");
        }
    }

    /// Detach only if `token` is still the attached one.
    ///
    /// Used when a login result arrives after the session it belonged to
    /// was ended; a token attached by a newer login is left alone.
    pub async fn detach_if_current(&self, token: &BearerToken) -> bool {
        let matched = {
            let mut current = self.current.write();
            if current.as_ref() == Some(token) {
                *current = None;
                true
            } else {
                false
            }
        };
        if matched {
            if let Err(e) = self.store.remove_item(TOKEN_KEY).await {
                warn!("[TokenHolder] Failed to erase persisted token: {}", e);
            }
            debug!("[TokenHolder] Stale session token detached");
        }
        matched
    }

    pub fn current(&self) -> Option<BearerToken> {
        self.current.read().clone()
    }

    pub fn is_attached(&self) -> bool {
        self.current.read().is_some()
    }

    /// `Authorization` header for the attached token
    pub fn authorization_header(&self) -> Option<String> {
        self.current.read().as_ref().map(BearerToken::header_value)
    }

    /// Read the durable copy, ignoring the in-memory token
    pub async fn persisted(&self) -> Option<BearerToken> {
        match self.store.get_item(TOKEN_KEY).await {
            Ok(value) => value
                .filter(|token| !token.trim().is_empty())
                .map(BearerToken::new),
            Err(e) => {
                warn!("[TokenHolder] Failed to read persisted token: {}", e);
                None
            }
        }
    }
}
