//! Presentation-facing state: feedback and routing

pub mod feedback;
pub mod messages;
pub mod routes;

pub use feedback::{FeedbackKind, FeedbackState};
pub use routes::Route;
