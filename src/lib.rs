//! Storage node HTTP service: identity and counters endpoints.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::schema::NodeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
