//! Access logging.
//!
//! One structured record per request, emitted only while the node is
//! verbose. Verbosity is a shared runtime flag toggled by signals and by
//! configuration reloads.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

/// Tracing target carrying access records.
pub const ACCESS_TARGET: &str = "access";

/// Snapshot of a finished request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessLogEvent {
    pub status: u16,
    pub time_spent_us: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub method: String,
    pub local: String,
    pub peer: String,
    pub path: String,
    pub request_id: String,
    pub tls: bool,
    pub ttfb_us: u64,
}

/// Destination of access records.
pub trait AccessLogSink: Send + Sync {
    fn emit(&self, event: &AccessLogEvent);
}

/// Writes access records through `tracing` on the `access` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAccessLog;

impl AccessLogSink for TracingAccessLog {
    fn emit(&self, event: &AccessLogEvent) {
        tracing::info!(
            target: ACCESS_TARGET,
            status = event.status,
            spent_us = event.time_spent_us,
            bytes_in = event.bytes_in,
            bytes_out = event.bytes_out,
            method = %event.method,
            local = %event.local,
            peer = %event.peer,
            path = %event.path,
            request_id = %event.request_id,
            tls = event.tls,
            ttfb_us = event.ttfb_us,
            "access"
        );
    }
}

/// Runtime switch for access logging.
#[derive(Debug, Default)]
pub struct Verbosity {
    enabled: AtomicBool,
}

impl Verbosity {
    pub fn new(enabled: bool) -> Self {
        Self { enabled: AtomicBool::new(enabled) }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Set the flag, returning the previous value.
    pub fn set(&self, enabled: bool) -> bool {
        let previous = self.enabled.swap(enabled, Ordering::Relaxed);
        if previous != enabled {
            tracing::info!(verbose = enabled, "Access log verbosity changed");
        }
        previous
    }
}
