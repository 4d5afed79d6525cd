//! Orchestrator: the single writer of [`AppState`]
//!
//! Each operation runs as `begin` (loading on, feedback cleared, ticket
//! issued), the remote work, and `finish` (result applied unless the
//! ticket's generation is stale). The state lock is never held across an
//! await point. Renderers observe [`StateView`] snapshots through
//! [`Orchestrator::subscribe`].

use log::{debug, info, warn};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;

use crate::common::messages::DomainMessage;
use crate::domains::auth::manager::AuthManager;
use crate::domains::auth::token::TokenHolder;
use crate::domains::ui::messages::Message as UiMessage;
use crate::domains::ui::routes::Route;
use crate::domains::user_management::cache::DirectorySync;
use crate::infra::services::{AuthApi, UserAdminService};
use crate::state::{AppState, StateView, Ticket};

pub struct Orchestrator {
    state: RwLock<AppState>,
    pub(crate) auth: AuthManager,
    pub(crate) directory: DirectorySync,
    views: watch::Sender<StateView>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("state", &*self.state.read())
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(auth: AuthManager, directory: DirectorySync) -> Self {
        let state = AppState::default();
        let (views, _) = watch::channel(state.view());
        Self {
            state: RwLock::new(state),
            auth,
            directory,
            views,
        }
    }

    /// Wire an orchestrator from service implementations sharing `tokens`
    pub fn from_services(
        auth_api: Arc<dyn AuthApi>,
        users: Arc<dyn UserAdminService>,
        tokens: TokenHolder,
    ) -> Self {
        let directory = DirectorySync::new(users, tokens.clone());
        let auth = AuthManager::new(auth_api, directory.clone(), tokens);
        Self::new(auth, directory)
    }

    pub fn snapshot(&self) -> StateView {
        self.state.read().view()
    }

    pub fn subscribe(&self) -> watch::Receiver<StateView> {
        self.views.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().session.is_authenticated()
    }

    pub fn tokens(&self) -> &TokenHolder {
        self.auth.tokens()
    }

    pub async fn handle(&self, message: DomainMessage) {
        debug!("[Orchestrator] {}", message.sanitized_display());
        match message {
            DomainMessage::Auth(msg) => self.handle_auth(msg).await,
            DomainMessage::UserManagement(msg) => {
                self.handle_user_management(msg).await
            }
            DomainMessage::Ui(msg) => self.handle_ui(msg),
        }
    }

    fn handle_ui(&self, message: UiMessage) {
        match message {
            UiMessage::Navigate(path) => {
                self.navigate(&path);
            }
            UiMessage::ClearFeedback => self.update(|state| state.feedback.clear()),
        }
    }

    /// Resolve `path` against the session and make it the current route
    pub fn navigate(&self, path: &str) -> Route {
        let mut state = self.state.write();
        let route = Route::resolve(path, state.session.is_authenticated());
        state.route = route;
        self.publish(&state);
        route
    }

    /// Synchronous mutation with publication
    pub(crate) fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut AppState),
    {
        let mut state = self.state.write();
        f(&mut state);
        self.publish(&state);
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state.read())
    }

    /// Identity gates every directory operation
    pub(crate) fn require_session(&self, operation: &str) -> bool {
        let authenticated = self.is_authenticated();
        if !authenticated {
            warn!("[Orchestrator] Ignoring {} without a session", operation);
        }
        authenticated
    }

    pub(crate) fn begin(&self) -> Ticket {
        let mut state = self.state.write();
        let ticket = state.begin_operation();
        self.publish(&state);
        ticket
    }

    /// Wipe the session and begin an operation in the new generation under
    /// one lock, so no other operation can start in between
    pub(crate) fn begin_new_session(&self) -> Ticket {
        let mut state = self.state.write();
        state.reset_session();
        let ticket = state.begin_operation();
        self.publish(&state);
        ticket
    }

    /// Apply `f` and end the operation, unless the session moved on.
    ///
    /// Returns false when the result was discarded.
    pub(crate) fn finish<F>(&self, ticket: Ticket, f: F) -> bool
    where
        F: FnOnce(&mut AppState),
    {
        let mut state = self.state.write();
        if state.generation != ticket.generation {
            info!(
                "[Orchestrator] Discarding result from generation {} (now {})",
                ticket.generation, state.generation
            );
            return false;
        }
        f(&mut state);
        state.in_flight = state.in_flight.saturating_sub(1);
        self.publish(&state);
        true
    }

    /// Bump the generation and wipe all session state
    pub(crate) fn reset_session(&self) {
        self.update(AppState::reset_session);
    }

    fn publish(&self, state: &AppState) {
        self.views.send_replace(state.view());
    }
}
