//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → NodeConfig (validated, immutable)
//!     → shared with the HTTP server and background tasks
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server applies the live-reloadable subset (verbosity)
//! ```
//!
//! # Design Decisions
//! - Node identity is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::NodeConfig;
pub use schema::NodeIdentity;
pub use schema::ListenerConfig;
pub use schema::TlsConfig;
pub use schema::HealthConfig;
pub use schema::LimitsConfig;
pub use schema::ObservabilityConfig;
pub use schema::LogFormat;
