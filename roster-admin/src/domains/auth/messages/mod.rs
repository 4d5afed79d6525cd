use crate::domains::auth::security::SecureCredential;

#[derive(Clone, Debug)]
pub enum Message {
    /// Submit the login form
    Login {
        email: String,
        password: SecureCredential,
    },
    /// Any edit to the login inputs
    LoginInputChanged,
    Logout,
}

impl Message {
    /// Returns a sanitized display string that hides sensitive credential data
    pub fn sanitized_display(&self) -> String {
        match self {
            Self::Login { email, .. } => {
                format!("Login {{ email: {:?}, password: *** }}", email)
            }
            _ => format!("{:?}", self),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "Auth::Login",
            Self::LoginInputChanged => "Auth::LoginInputChanged",
            Self::Logout => "Auth::Logout",
        }
    }
}
