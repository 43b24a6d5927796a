//! Shared fakes and helpers for the integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;

use blob_node::config::{LimitsConfig, NodeIdentity};
use blob_node::health::HealthCheck;
use blob_node::http::{AppState, HttpServer, ListenerInfo};
use blob_node::observability::{
    AccessLogEvent, AccessLogSink, Accounted, HandlerKind, RequestSample, StatsRecorder, Verbosity,
};

pub const PEER: &str = "10.1.2.3:40000";
pub const LOCAL: &str = "127.0.0.1:6200";

/// Health flag flipped by the tests.
#[derive(Default)]
pub struct FakeHealth {
    unhealthy: AtomicBool,
    pub checks: Mutex<u32>,
}

impl FakeHealth {
    pub fn set_healthy(&self, healthy: bool) {
        self.unhealthy.store(!healthy, Ordering::SeqCst);
    }
}

impl HealthCheck for FakeHealth {
    fn is_io_ok(&self) -> bool {
        *self.checks.lock().unwrap() += 1;
        !self.unhealthy.load(Ordering::SeqCst)
    }
}

/// Records every accounting call.
#[derive(Default)]
pub struct RecordingStats {
    pub calls: Mutex<Vec<(HandlerKind, RequestSample)>>,
}

impl RecordingStats {
    pub fn calls(&self) -> Vec<(HandlerKind, RequestSample)> {
        self.calls.lock().unwrap().clone()
    }
}

impl StatsRecorder for RecordingStats {
    fn record(&self, kind: HandlerKind, sample: &RequestSample) -> Accounted {
        self.calls.lock().unwrap().push((kind, *sample));
        Accounted {
            spent_us: sample.elapsed.as_micros() as u64,
            ttfb_us: sample.ttfb.as_micros() as u64,
        }
    }

    fn counters(&self) -> Vec<(&'static str, u64)> {
        vec![("req.hits", self.calls.lock().unwrap().len() as u64)]
    }
}

/// Captures access records.
#[derive(Default)]
pub struct CapturingLog {
    pub events: Mutex<Vec<AccessLogEvent>>,
}

impl CapturingLog {
    pub fn events(&self) -> Vec<AccessLogEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl AccessLogSink for CapturingLog {
    fn emit(&self, event: &AccessLogEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// A node wired to fake collaborators.
pub struct TestNode {
    pub state: AppState,
    pub health: Arc<FakeHealth>,
    pub stats: Arc<RecordingStats>,
    pub log: Arc<CapturingLog>,
}

impl TestNode {
    pub fn new(identity: NodeIdentity, verbose: bool) -> Self {
        Self::with_limits(identity, verbose, LimitsConfig::default())
    }

    pub fn with_limits(identity: NodeIdentity, verbose: bool, limits: LimitsConfig) -> Self {
        let health = Arc::new(FakeHealth::default());
        let stats = Arc::new(RecordingStats::default());
        let log = Arc::new(CapturingLog::default());
        let state = AppState {
            identity: Arc::new(identity),
            health: health.clone(),
            stats: stats.clone(),
            access_log: log.clone(),
            verbosity: Arc::new(Verbosity::new(verbose)),
            limits,
        };
        Self { state, health, stats, log }
    }

    pub fn router(&self, tls: bool) -> Router {
        let listener = ListenerInfo {
            local_addr: LOCAL.parse().unwrap(),
            tls,
        };
        let peer: SocketAddr = PEER.parse().unwrap();
        HttpServer::build_router(self.state.clone(), listener).layer(MockConnectInfo(peer))
    }
}

pub fn identity(namespace: &str, volume: &str, service_id: &str, tls_url: &str) -> NodeIdentity {
    NodeIdentity {
        namespace: namespace.into(),
        volume: volume.into(),
        service_id: service_id.into(),
        tls_url: tls_url.into(),
    }
}

pub fn request(method: Method, uri: &str, body: Body) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(body).unwrap()
}

pub async fn body_string(resp: Response) -> String {
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
