//! Service identity endpoint.
//!
//! ```text
//! drain body ──fail──────────────────────────────┐
//!     │                                          │
//! health gate ──unhealthy (503)──────────────────┤
//!     │                                          ▼
//! dispatch ──other method (405)────────────▶ accounting ─▶ done
//!     │                                          ▲
//! GET/HEAD → identity text (200) ────────────────┘
//! ```

use std::net::SocketAddr;

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, State},
    http::{Method, Request},
    response::Response,
    Extension,
};

use crate::config::NodeIdentity;
use crate::health::HealthCheck;
use crate::http::drain::drain_within;
use crate::http::epilogue::complete;
use crate::http::error::RequestError;
use crate::http::request::{ListenerInfo, RequestContext};
use crate::http::response::Reply;
use crate::http::server::AppState;
use crate::observability::HandlerKind;

/// Method dispatch of the info endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoRoute {
    Info,
    MethodNotAllowed,
}

impl InfoRoute {
    pub fn for_method(method: &Method) -> Self {
        if *method == Method::GET || *method == Method::HEAD {
            InfoRoute::Info
        } else {
            InfoRoute::MethodNotAllowed
        }
    }
}

/// Identity text: namespace and path, then service id and TLS URL when set.
pub fn render_info(identity: &NodeIdentity) -> Bytes {
    let mut out = String::with_capacity(64);
    push_line(&mut out, "namespace", &identity.namespace);
    push_line(&mut out, "path", &identity.volume);
    if !identity.service_id.is_empty() {
        push_line(&mut out, "service_id", &identity.service_id);
    }
    if !identity.tls_url.is_empty() {
        push_line(&mut out, "url_tls", &identity.tls_url);
    }
    Bytes::from(out)
}

pub(crate) fn push_line(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push(' ');
    out.push_str(value);
    out.push('\n');
}

/// Refuse to serve while the storage backend is unhealthy.
pub fn ensure_healthy(health: &dyn HealthCheck) -> Result<(), RequestError> {
    if health.is_io_ok() {
        Ok(())
    } else {
        Err(RequestError::BackendUnhealthy)
    }
}

pub async fn info_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Extension(listener): Extension<ListenerInfo>,
    request: Request<Body>,
) -> Response {
    let (parts, body) = request.into_parts();
    let mut ctx = RequestContext::new(state.identity.clone(), &parts, peer, listener);

    let outcome = serve_info(&state, &mut ctx, body).await;
    complete(&state, HandlerKind::Info, ctx, outcome)
}

async fn serve_info(
    state: &AppState,
    ctx: &mut RequestContext,
    body: Body,
) -> Result<Reply, RequestError> {
    drain_within(body, &state.limits, &mut ctx.bytes_in).await?;
    ensure_healthy(state.health.as_ref())?;

    Ok(match InfoRoute::for_method(&ctx.method) {
        InfoRoute::Info => Reply::Text(render_info(&ctx.identity)),
        InfoRoute::MethodNotAllowed => Reply::MethodNotAllowed,
    })
}
