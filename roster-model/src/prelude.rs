//! Client focused snapshot of the types surface.
//! Prefer importing from this module instead of individual tree nodes when
//! working in roster-admin or other presentation layers.

pub use super::error::{ModelError, Result as ModelResult};
pub use super::ids::UserId;
pub use super::requests::{
    CreateUserRequest, LoginRequest, LoginResponse, SalaryRequest,
    UpdateUserRequest,
};
pub use super::role::Role;
pub use super::user::UserRecord;
