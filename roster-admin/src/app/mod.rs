//! Application wiring and the command line front end

pub mod bootstrap;
pub mod cli;

pub use bootstrap::{AppConfig, build_orchestrator};
