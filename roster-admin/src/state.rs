//! Application state owned by the orchestrator

use roster_model::prelude::{UserId, UserRecord};

use crate::domains::auth::state_types::{Identity, SessionStore};
use crate::domains::ui::feedback::FeedbackState;
use crate::domains::ui::routes::Route;
use crate::domains::user_management::cache::DirectoryCache;
use crate::domains::user_management::form::FormState;

/// Captured when an operation starts; decides whether its result applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct AppState {
    /// Bumped by logout; results from an older generation are discarded
    pub generation: u64,
    pub in_flight: usize,

    pub session: SessionStore,
    pub directory: DirectoryCache,
    pub form: FormState,
    pub feedback: FeedbackState,
    /// Awaiting confirmation
    pub pending_delete: Option<UserId>,
    pub route: Route,
}

impl AppState {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn begin_operation(&mut self) -> Ticket {
        self.in_flight += 1;
        self.feedback.clear();
        Ticket {
            generation: self.generation,
        }
    }

    /// Wipe everything tied to a session and start a new generation
    pub fn reset_session(&mut self) {
        self.generation += 1;
        self.in_flight = 0;
        self.session.logout();
        self.directory.clear();
        self.form.close();
        self.feedback.clear();
        self.pending_delete = None;
        self.route = Route::Entry;
    }

    pub fn view(&self) -> StateView {
        StateView {
            identity: self.session.identity().cloned(),
            route: self.route,
            users: self.directory.records().to_vec(),
            form: self.form.clone(),
            feedback: self.feedback.clone(),
            loading: self.is_loading(),
            pending_delete: self.pending_delete,
        }
    }
}

/// Read-only projection handed to renderers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateView {
    pub identity: Option<Identity>,
    pub route: Route,
    pub users: Vec<UserRecord>,
    pub form: FormState,
    pub feedback: FeedbackState,
    pub loading: bool,
    pub pending_delete: Option<UserId>,
}

impl StateView {
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}
