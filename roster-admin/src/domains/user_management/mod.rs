//! User management domain
//!
//! The directory cache, the user form and the handlers for directory
//! mutations.

pub mod cache;
pub mod form;
pub mod messages;
pub mod update;

pub use cache::{DirectoryCache, DirectorySync};
pub use form::{FormField, FormFields, FormMode, FormState, SubmitPayload};
pub use messages::Message as UserManagementMessage;
