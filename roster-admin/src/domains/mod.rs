//! Domain modules for the Roster admin client
//!
//! Each domain owns its state types and the message handlers that the
//! orchestrator dispatches to.

pub mod auth;
pub mod ui;
pub mod user_management;
