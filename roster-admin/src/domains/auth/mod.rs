//! Authentication domain
//!
//! Credential normalization, token custody and the session identity.

pub mod errors;
pub mod manager;
pub mod messages;
pub mod normalize;
pub mod security;
pub mod state_types;
pub mod storage;
pub mod token;
pub mod update;

pub use errors::{AuthError, StorageError};
pub use manager::{AuthManager, LoginOutcome};
pub use messages::Message as AuthMessage;
pub use normalize::normalize;
pub use state_types::{AuthState, Identity, SessionStore};
pub use token::{BearerToken, TokenHolder};
