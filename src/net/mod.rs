//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → plain listener (axum::serve)
//!     → or TLS listener (axum-server + rustls, tls.rs)
//!     → Hand off to HTTP layer with the listener's address and TLS flag
//! ```

pub mod tls;
