//! Authentication message handlers

use log::info;

use super::manager::validate_credentials;
use super::messages::Message;
use super::security::SecureCredential;
use crate::domains::ui::feedback::login_error_message;
use crate::domains::ui::routes::Route;
use crate::errors::ClientError;
use crate::orchestrator::Orchestrator;

impl Orchestrator {
    pub(crate) async fn handle_auth(&self, message: Message) {
        match message {
            Message::Login { email, password } => {
                self.login(&email, &password).await;
            }
            Message::LoginInputChanged => self.update(|state| {
                if state.feedback.is_error() {
                    state.feedback.clear();
                }
            }),
            Message::Logout => self.logout().await,
        }
    }

    /// Log in and show the directory. Returns true when the session was
    /// established.
    ///
    /// Valid credentials end any existing session first, so a failed login
    /// always leaves the client unauthenticated with no token attached.
    pub async fn login(&self, email: &str, password: &SecureCredential) -> bool {
        if let Err(validation) = validate_credentials(email, password) {
            let err = ClientError::from(validation);
            self.update(|state| state.feedback.set_error(login_error_message(&err)));
            return false;
        }
        if self.is_authenticated() || self.tokens().is_attached() {
            info!("[Auth] New login supersedes the current session");
        }
        self.auth.logout().await;
        let ticket = self.begin_new_session();
        let still_current =
            || self.read(|state| state.generation == ticket.generation);

        match self.auth.login(email, password, still_current).await {
            Ok(outcome) => {
                let token = outcome.identity.token.clone();
                let applied = self.finish(ticket, |state| {
                    state.directory.apply_snapshot(outcome.directory);
                    state.session.authenticate(outcome.identity);
                    state.route = Route::Directory;
                });
                if !applied {
                    self.auth.discard_token(&token).await;
                }
                applied
            }
            Err(err) => {
                info!("[Auth] Login failed: {}", err);
                self.finish(ticket, |state| {
                    state.feedback.set_error(login_error_message(&err));
                });
                false
            }
        }
    }

    /// End the session. Unconditional and idempotent.
    pub async fn logout(&self) {
        self.reset_session();
        self.auth.logout().await;
        info!("[Auth] Logged out");
    }
}
