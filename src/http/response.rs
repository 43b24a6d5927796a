//! Reply construction.
//!
//! # Responsibilities
//! - Turn a handler outcome into an HTTP response
//! - Record status, ttfb and bytes written on the request context
//!
//! # Design Decisions
//! - Error replies carry no body
//! - HEAD replies are built like GET; the body is stripped by the router
//!   while Content-Length and the accounted byte count are kept

use axum::{
    body::Bytes,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::request::RequestContext;

/// Terminal outcome of a request handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// 200 with a plaintext body.
    Text(Bytes),
    /// 405, only GET and HEAD are served.
    MethodNotAllowed,
    /// Bare error status.
    Error(StatusCode),
}

impl Reply {
    /// Build the response, recording the reply on `ctx`.
    pub fn finish(self, ctx: &mut RequestContext) -> Response {
        match self {
            Reply::Text(body) => {
                ctx.set_status(StatusCode::OK);
                ctx.mark_first_byte();
                ctx.bytes_out = body.len() as u64;
                (
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, "text/plain")],
                    body,
                )
                    .into_response()
            }
            Reply::MethodNotAllowed => {
                ctx.set_status(StatusCode::METHOD_NOT_ALLOWED);
                (
                    StatusCode::METHOD_NOT_ALLOWED,
                    [(header::ALLOW, "GET, HEAD")],
                )
                    .into_response()
            }
            Reply::Error(status) => {
                ctx.set_status(status);
                status.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NodeIdentity;
    use crate::http::request::ListenerInfo;
    use axum::http::Request;
    use std::sync::Arc;
    use std::time::Duration;

    fn ctx() -> RequestContext {
        let (parts, _) = Request::builder().uri("/info").body(()).unwrap().into_parts();
        RequestContext::new(
            Arc::new(NodeIdentity::default()),
            &parts,
            "127.0.0.1:40000".parse().unwrap(),
            ListenerInfo { local_addr: "127.0.0.1:6200".parse().unwrap(), tls: false },
        )
    }

    #[test]
    fn test_text_reply_records_success() {
        let mut ctx = ctx();
        let response = Reply::Text(Bytes::from_static(b"namespace NS\n")).finish(&mut ctx);

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(ctx.status(), StatusCode::OK);
        assert_eq!(ctx.bytes_out, 13);
        assert!(ctx.ttfb <= ctx.start.elapsed());
    }

    #[test]
    fn test_method_not_allowed_reply() {
        let mut ctx = ctx();
        let response = Reply::MethodNotAllowed.finish(&mut ctx);

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, HEAD");
        assert_eq!(ctx.bytes_out, 0);
        assert_eq!(ctx.ttfb, Duration::ZERO);
    }

    #[test]
    fn test_error_reply_keeps_ttfb_zero() {
        let mut ctx = ctx();
        let response = Reply::Error(StatusCode::SERVICE_UNAVAILABLE).finish(&mut ctx);

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ctx.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ctx.ttfb, Duration::ZERO);
    }
}
