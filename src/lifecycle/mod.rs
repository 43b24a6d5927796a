//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Logging → Metrics → Bind listeners
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → probe stops, listeners drain → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     SIGUSR1/SIGUSR2 → Access log on/off
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
