//! Infrastructure: HTTP transport, service traits and configuration

pub mod api_client;
pub mod api_routes;
pub mod config;
pub mod services;
pub mod testing;

pub use api_client::ApiClient;
pub use config::Config;
