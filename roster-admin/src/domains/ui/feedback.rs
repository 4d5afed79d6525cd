//! Transient operation feedback

use crate::errors::{AuthError, ClientError};

/// User-facing strings
pub mod text {
    pub const USER_CREATED: &str = "New user created.";
    pub const USER_UPDATED: &str = "User updated.";
    pub const ROLE_UPDATED: &str = "User role updated.";
    pub const USER_DELETED: &str = "User deleted.";
    pub const SALARY_UPDATED: &str = "Salary updated.";

    pub const LIST_FAILED: &str = "Failed to load the user list.";
    pub const SAVE_FAILED: &str = "An error occurred while saving the user.";
    pub const DELETE_FAILED: &str = "An error occurred while deleting the user.";
    pub const SALARY_FAILED: &str = "An error occurred while saving the salary.";
    pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
    pub const INVALID_CREDENTIALS: &str = "The credentials you entered are invalid. \
                                           Please check your email and password.";
    pub const MISSING_CREDENTIALS: &str = "Email and password are required.";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    None,
    Error,
    Success,
}

/// At most one message at a time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FeedbackState {
    #[default]
    None,
    Error(String),
    Success(String),
}

impl FeedbackState {
    pub fn kind(&self) -> FeedbackKind {
        match self {
            FeedbackState::None => FeedbackKind::None,
            FeedbackState::Error(_) => FeedbackKind::Error,
            FeedbackState::Success(_) => FeedbackKind::Success,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            FeedbackState::None => None,
            FeedbackState::Error(message) | FeedbackState::Success(message) => {
                Some(message)
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FeedbackState::Error(_))
    }

    pub fn clear(&mut self) {
        *self = FeedbackState::None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        *self = FeedbackState::Error(message.into());
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        *self = FeedbackState::Success(message.into());
    }
}

/// Text for a failed operation: validation text, then server detail, then
/// `default`.
pub fn error_message(err: &ClientError, default: &str) -> String {
    match err {
        ClientError::Validation(validation) => validation.to_string(),
        other => other.detail().unwrap_or(default).to_string(),
    }
}

/// Login adds the dedicated invalid-credentials text
pub fn login_error_message(err: &ClientError) -> String {
    match err {
        ClientError::Auth(AuthError::InvalidCredentials) => {
            text::INVALID_CREDENTIALS.to_string()
        }
        other => error_message(other, text::LOGIN_FAILED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ProtocolError, RemoteError, ValidationError};

    #[test]
    fn server_detail_wins_over_default() {
        let err = ClientError::from(RemoteError::new(400, Some("email exists".into())));
        assert_eq!(error_message(&err, text::SAVE_FAILED), "email exists");

        let bare = ClientError::from(RemoteError::new(500, None));
        assert_eq!(error_message(&bare, text::SAVE_FAILED), text::SAVE_FAILED);
    }

    #[test]
    fn login_messages() {
        assert_eq!(
            login_error_message(&AuthError::InvalidCredentials.into()),
            text::INVALID_CREDENTIALS
        );
        assert_eq!(
            login_error_message(&ValidationError::MissingCredentials.into()),
            text::MISSING_CREDENTIALS
        );
        assert_eq!(
            login_error_message(&ProtocolError::MissingToken.into()),
            text::LOGIN_FAILED
        );
        let locked: ClientError = AuthError::LoginFailed {
            status: Some(403),
            detail: Some("Account disabled".into()),
        }
        .into();
        assert_eq!(login_error_message(&locked), "Account disabled");
    }

    #[test]
    fn setting_one_kind_replaces_the_other() {
        let mut feedback = FeedbackState::default();
        feedback.set_error("boom");
        feedback.set_success("ok");
        assert_eq!(feedback.kind(), FeedbackKind::Success);
        assert_eq!(feedback.message(), Some("ok"));

        feedback.clear();
        assert_eq!(feedback.kind(), FeedbackKind::None);
        assert_eq!(feedback.message(), None);
    }
}
