//! Per-request state.
//!
//! # Responsibilities
//! - Carry the node identity and request metadata through the lifecycle
//! - Resolve the request ID (propagated header or freshly generated)
//! - Record status, byte counters and time to first byte
//!
//! # Design Decisions
//! - The status is set exactly once, before any body is produced
//! - ttfb stays zero unless a success reply is produced

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::{request::Parts, Method, StatusCode};

use crate::config::NodeIdentity;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// The listener a request arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerInfo {
    pub local_addr: SocketAddr,
    pub tls: bool,
}

/// State of one request, owned by its handler invocation.
#[derive(Debug)]
pub struct RequestContext {
    pub identity: Arc<NodeIdentity>,
    pub method: Method,
    pub path: String,
    pub request_id: String,
    pub remote_addr: SocketAddr,
    pub local_addr: SocketAddr,
    pub is_tls: bool,
    pub start: Instant,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub ttfb: Duration,
    status: Option<StatusCode>,
}

impl RequestContext {
    pub fn new(
        identity: Arc<NodeIdentity>,
        parts: &Parts,
        remote_addr: SocketAddr,
        listener: ListenerInfo,
    ) -> Self {
        let request_id = parts
            .headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());

        Self {
            identity,
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            request_id,
            remote_addr,
            local_addr: listener.local_addr,
            is_tls: listener.tls,
            start: Instant::now(),
            bytes_in: 0,
            bytes_out: 0,
            ttfb: Duration::ZERO,
            status: None,
        }
    }

    /// Record the reply status.
    pub fn set_status(&mut self, status: StatusCode) {
        if let Some(previous) = self.status {
            tracing::warn!(
                request_id = %self.request_id,
                %previous,
                ignored = %status,
                "Reply status already set"
            );
            return;
        }
        self.status = Some(status);
    }

    /// The reply status, 500 if the handler never set one.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Mark the instant the success status is emitted.
    pub fn mark_first_byte(&mut self) {
        self.ttfb = self.start.elapsed();
    }
}
