//! Volume health subsystem.
//!
//! # Data Flow
//! ```text
//! Active probe (probe.rs):
//!     Periodic timer
//!     → write + remove a probe file in the volume
//!     → Update state.rs
//!
//! State machine (state.rs):
//!     Healthy ←→ Unhealthy
//!     With thresholds to prevent flapping
//!
//! Request handlers:
//!     → HealthCheck::is_io_ok() before serving
//! ```

pub mod probe;
pub mod state;

pub use probe::VolumeProbe;
pub use state::{HealthState, IoHealth};

/// Backend health as seen by request handlers.
pub trait HealthCheck: Send + Sync {
    /// True while the storage backend accepts IO.
    fn is_io_ok(&self) -> bool;
}
