//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handlers (epilogue):
//!     → stats.rs (node counters, mirrored into metrics)
//!     → access_log.rs (one record per request when verbose)
//!
//! Consumers:
//!     → /stat endpoint (plaintext counters)
//!     → metrics.rs (Prometheus scrape)
//!     → logging.rs (stdout, pretty or JSON)
//! ```
//!
//! # Design Decisions
//! - Collaborators are traits injected into the handler state
//! - Counters are atomics, no lock on the request path
//! - Access logging is switched at runtime, not at startup only

pub mod access_log;
pub mod logging;
pub mod metrics;
pub mod stats;

pub use access_log::{AccessLogEvent, AccessLogSink, TracingAccessLog, Verbosity};
pub use stats::{Accounted, HandlerKind, NodeStats, RequestSample, StatsRecorder};
