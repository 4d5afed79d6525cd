pub mod auth;
pub mod user_management;

pub use auth::{AuthApi, AuthApiAdapter};
pub use user_management::{UserAdminApiAdapter, UserAdminService};
