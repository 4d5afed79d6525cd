//! Roster admin client library
//!
//! This crate contains the session and form orchestration used by the
//! `roster-admin` binary in `src/main.rs`. A renderer (the bundled CLI, or
//! any other front end) drives the [`orchestrator::Orchestrator`] with
//! messages and reads back [`state::StateView`] snapshots.
//!
//! Notes
//! - Public items are subject to change while the admin surface stabilizes.
//! - Most consumers should use the `roster-admin` binary; the library is
//!   exposed mainly to enable testing and alternative front ends.

pub mod app;
pub mod common;
pub mod domains;
pub mod errors;
pub mod infra;
pub mod orchestrator;
pub mod state;
