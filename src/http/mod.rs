//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware, listeners)
//!     → request.rs (request context, request ID)
//!     → drain.rs (discard the request body)
//!     → info.rs / stat.rs (health gate, method dispatch, payload)
//!     → response.rs (status, headers, body)
//!     → epilogue.rs (statistics, access log)
//!     → Send to client
//! ```

pub mod drain;
pub mod epilogue;
pub mod error;
pub mod info;
pub mod request;
pub mod response;
pub mod server;
pub mod stat;

pub use error::{DrainError, RequestError};
pub use request::{ListenerInfo, RequestContext, X_REQUEST_ID};
pub use response::Reply;
pub use server::{AppState, HttpServer, ServerError};
