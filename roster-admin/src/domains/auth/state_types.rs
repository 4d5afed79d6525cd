//! Session identity types

use roster_model::prelude::Role;

use super::token::BearerToken;

/// The authenticated administrator
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub token: BearerToken,
    pub token_type: Option<String>,
    /// Directory name of the matched record, or the placeholder
    pub display_name: String,
    pub surname: Option<String>,
    /// The login email as typed, trimmed but not normalized
    pub email: String,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated {
        identity: Identity,
    },
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthState::Authenticated { identity } => Some(identity),
            AuthState::Unauthenticated => None,
        }
    }
}

/// In-memory identity holder owned by the application state
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    state: AuthState,
}

impl SessionStore {
    pub fn authenticate(&mut self, identity: Identity) {
        log::info!(
            "[Session] Authenticated as {} ({})",
            identity.display_name,
            identity.email
        );
        self.state = AuthState::Authenticated { identity };
    }

    pub fn logout(&mut self) {
        self.state = AuthState::Unauthenticated;
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.state.identity()
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            token: BearerToken::new("t"),
            token_type: Some("bearer".into()),
            display_name: "Ayse".into(),
            surname: Some("Yilmaz".into()),
            email: "ayse@x.io".into(),
            role: Some(Role::Admin),
        }
    }

    #[test]
    fn authenticate_then_logout() {
        let mut session = SessionStore::default();
        assert!(!session.is_authenticated());

        session.authenticate(identity());
        assert!(session.is_authenticated());
        assert_eq!(session.identity().map(|i| i.display_name.as_str()), Some("Ayse"));

        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.identity().is_none());
    }
}
