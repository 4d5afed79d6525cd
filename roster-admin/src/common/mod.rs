//! Common module containing shared message types

pub mod messages;

pub use messages::DomainMessage;
