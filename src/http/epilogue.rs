//! Request completion: reply, statistics, access log.
//!
//! Every handler outcome, failures included, goes through [`complete`], so
//! each request is accounted exactly once.

use axum::http::HeaderValue;
use axum::response::Response;

use crate::http::error::RequestError;
use crate::http::request::{RequestContext, X_REQUEST_ID};
use crate::http::response::Reply;
use crate::http::server::AppState;
use crate::observability::{AccessLogEvent, Accounted, HandlerKind, RequestSample};

/// Turn a handler outcome into the response and account the request.
pub fn complete(
    state: &AppState,
    kind: HandlerKind,
    mut ctx: RequestContext,
    outcome: Result<Reply, RequestError>,
) -> Response {
    let reply = match outcome {
        Ok(reply) => reply,
        Err(e) => {
            match &e {
                RequestError::Drain(_) => tracing::warn!(
                    request_id = %ctx.request_id,
                    peer = %ctx.remote_addr,
                    bytes_in = ctx.bytes_in,
                    error = %e,
                    "Request body drain failed"
                ),
                RequestError::BackendUnhealthy => tracing::debug!(
                    request_id = %ctx.request_id,
                    handler = kind.as_str(),
                    "Refusing request, volume unhealthy"
                ),
            }
            Reply::Error(e.status())
        }
    };

    let mut response = reply.finish(&mut ctx);
    if let Ok(id) = HeaderValue::from_str(&ctx.request_id) {
        response.headers_mut().insert(X_REQUEST_ID, id);
    }
    account(state, kind, &ctx);
    response
}

/// Update statistics, then emit the access record when verbose.
pub fn account(state: &AppState, kind: HandlerKind, ctx: &RequestContext) -> Accounted {
    let sample = RequestSample {
        status: ctx.status(),
        elapsed: ctx.start.elapsed(),
        ttfb: ctx.ttfb,
        bytes_in: ctx.bytes_in,
        bytes_out: ctx.bytes_out,
    };
    let accounted = state.stats.record(kind, &sample);

    if state.verbosity.is_enabled() {
        state.access_log.emit(&access_event(ctx, accounted));
    }
    accounted
}

/// Access record mirroring the final request values.
pub fn access_event(ctx: &RequestContext, accounted: Accounted) -> AccessLogEvent {
    AccessLogEvent {
        status: ctx.status().as_u16(),
        time_spent_us: accounted.spent_us,
        bytes_in: ctx.bytes_in,
        bytes_out: ctx.bytes_out,
        method: ctx.method.to_string(),
        local: ctx.local_addr.to_string(),
        peer: ctx.remote_addr.to_string(),
        path: ctx.path.clone(),
        request_id: ctx.request_id.clone(),
        tls: ctx.is_tls,
        ttfb_us: accounted.ttfb_us,
    }
}
