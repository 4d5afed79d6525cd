//! In-memory test doubles for the service traits

pub mod stubs;
