//! Counters endpoint.
//!
//! Same drain and accounting as the info endpoint, without the health gate:
//! counters stay readable while the volume is down.

use std::net::SocketAddr;

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, State},
    http::Request,
    response::Response,
    Extension,
};

use crate::config::NodeIdentity;
use crate::http::drain::drain_within;
use crate::http::epilogue::complete;
use crate::http::error::RequestError;
use crate::http::info::{push_line, InfoRoute};
use crate::http::request::{ListenerInfo, RequestContext};
use crate::http::response::Reply;
use crate::http::server::AppState;
use crate::observability::HandlerKind;

/// `counter <name> <value>` lines, then the volume and service id.
pub fn render_stats(counters: &[(&'static str, u64)], identity: &NodeIdentity) -> Bytes {
    let mut out = String::with_capacity(32 * (counters.len() + 2));
    for (name, value) in counters {
        out.push_str("counter ");
        push_line(&mut out, name, &value.to_string());
    }
    push_line(&mut out, "config volume", &identity.volume);
    if !identity.service_id.is_empty() {
        push_line(&mut out, "config service_id", &identity.service_id);
    }
    Bytes::from(out)
}

pub async fn stat_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Extension(listener): Extension<ListenerInfo>,
    request: Request<Body>,
) -> Response {
    let (parts, body) = request.into_parts();
    let mut ctx = RequestContext::new(state.identity.clone(), &parts, peer, listener);

    let outcome = serve_stat(&state, &mut ctx, body).await;
    complete(&state, HandlerKind::Stat, ctx, outcome)
}

async fn serve_stat(
    state: &AppState,
    ctx: &mut RequestContext,
    body: Body,
) -> Result<Reply, RequestError> {
    drain_within(body, &state.limits, &mut ctx.bytes_in).await?;

    Ok(match InfoRoute::for_method(&ctx.method) {
        InfoRoute::Info => Reply::Text(render_stats(&state.stats.counters(), &ctx.identity)),
        InfoRoute::MethodNotAllowed => Reply::MethodNotAllowed,
    })
}
