//! Core data model definitions shared across Roster crates.
#![allow(missing_docs)]

pub mod error;
pub mod ids;
pub mod prelude;
pub mod requests;
pub mod role;
pub mod user;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use ids::UserId;
pub use requests::{
    CreateUserRequest, LoginRequest, LoginResponse, SalaryRequest,
    UpdateUserRequest,
};
pub use role::Role;
pub use user::UserRecord;
