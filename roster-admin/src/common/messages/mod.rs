use crate::domains::auth;
use crate::domains::ui;
use crate::domains::user_management;

/// Every message the orchestrator accepts, grouped by domain
#[derive(Clone, Debug)]
pub enum DomainMessage {
    /// Authentication domain
    Auth(auth::messages::Message),

    /// User management domain
    UserManagement(user_management::messages::Message),

    /// Routing and feedback
    Ui(ui::messages::Message),
}

impl From<auth::messages::Message> for DomainMessage {
    fn from(msg: auth::messages::Message) -> Self {
        DomainMessage::Auth(msg)
    }
}

impl From<user_management::messages::Message> for DomainMessage {
    fn from(msg: user_management::messages::Message) -> Self {
        DomainMessage::UserManagement(msg)
    }
}

impl From<ui::messages::Message> for DomainMessage {
    fn from(msg: ui::messages::Message) -> Self {
        DomainMessage::Ui(msg)
    }
}

impl DomainMessage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auth(msg) => msg.name(),
            Self::UserManagement(msg) => msg.name(),
            Self::Ui(msg) => msg.name(),
        }
    }

    pub fn sanitized_display(&self) -> String {
        match self {
            Self::Auth(msg) => msg.sanitized_display(),
            Self::UserManagement(msg) => msg.sanitized_display(),
            Self::Ui(msg) => format!("{:?}", msg),
        }
    }
}
