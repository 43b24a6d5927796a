//! Request statistics.
//!
//! # Counters
//! - `req.hits.<handler>` / `req.time.<handler>` / `req.ttfb.<handler>`:
//!   hits and cumulated microseconds per handler
//! - `rep.hits.2xx|4xx|5xx`: replies per status class
//! - `rep.hits.405|503`: the declared non-success outcomes
//! - `rep.bread` / `rep.bwritten`: body bytes drained and written
//!
//! Every update is mirrored into the `metrics` facade so the Prometheus
//! exporter sees the same numbers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::http::StatusCode;

/// Request family being accounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Info,
    Stat,
}

impl HandlerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::Info => "info",
            HandlerKind::Stat => "stat",
        }
    }
}

/// Final values of a request, handed over at accounting time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSample {
    pub status: StatusCode,
    pub elapsed: Duration,
    pub ttfb: Duration,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

/// Times actually recorded by the statistics layer, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Accounted {
    pub spent_us: u64,
    pub ttfb_us: u64,
}

/// Statistics collaborator of the request handlers.
pub trait StatsRecorder: Send + Sync {
    /// Account one finished request.
    fn record(&self, kind: HandlerKind, sample: &RequestSample) -> Accounted;

    /// Current counter values, in a stable order.
    fn counters(&self) -> Vec<(&'static str, u64)>;
}

#[derive(Debug, Default)]
struct HandlerCounters {
    hits: AtomicU64,
    time_us: AtomicU64,
    ttfb_us: AtomicU64,
}

impl HandlerCounters {
    fn add(&self, accounted: Accounted) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        self.time_us.fetch_add(accounted.spent_us, Ordering::Relaxed);
        self.ttfb_us.fetch_add(accounted.ttfb_us, Ordering::Relaxed);
    }
}

/// Lock-free node counters.
#[derive(Debug, Default)]
pub struct NodeStats {
    info: HandlerCounters,
    stat: HandlerCounters,
    hits_2xx: AtomicU64,
    hits_4xx: AtomicU64,
    hits_5xx: AtomicU64,
    hits_405: AtomicU64,
    hits_503: AtomicU64,
    bytes_read: AtomicU64,
    bytes_written: AtomicU64,
}

impl NodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn handler(&self, kind: HandlerKind) -> &HandlerCounters {
        match kind {
            HandlerKind::Info => &self.info,
            HandlerKind::Stat => &self.stat,
        }
    }
}

fn micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

impl StatsRecorder for NodeStats {
    fn record(&self, kind: HandlerKind, sample: &RequestSample) -> Accounted {
        let accounted = Accounted {
            spent_us: micros(sample.elapsed),
            ttfb_us: micros(sample.ttfb),
        };

        self.handler(kind).add(accounted);

        let class = match sample.status.as_u16() / 100 {
            2 => Some(&self.hits_2xx),
            4 => Some(&self.hits_4xx),
            5 => Some(&self.hits_5xx),
            _ => None,
        };
        if let Some(counter) = class {
            counter.fetch_add(1, Ordering::Relaxed);
        }
        match sample.status {
            StatusCode::METHOD_NOT_ALLOWED => {
                self.hits_405.fetch_add(1, Ordering::Relaxed);
            }
            StatusCode::SERVICE_UNAVAILABLE => {
                self.hits_503.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
        self.bytes_read.fetch_add(sample.bytes_in, Ordering::Relaxed);
        self.bytes_written.fetch_add(sample.bytes_out, Ordering::Relaxed);

        metrics::counter!(
            "blob_node_requests_total",
            "handler" => kind.as_str(),
            "status" => sample.status.as_u16().to_string()
        )
        .increment(1);
        metrics::histogram!("blob_node_request_duration_seconds", "handler" => kind.as_str())
            .record(sample.elapsed.as_secs_f64());
        metrics::counter!("blob_node_bytes_read_total").increment(sample.bytes_in);
        metrics::counter!("blob_node_bytes_written_total").increment(sample.bytes_out);

        accounted
    }

    fn counters(&self) -> Vec<(&'static str, u64)> {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        let hits = load(&self.info.hits) + load(&self.stat.hits);
        let time = load(&self.info.time_us) + load(&self.stat.time_us);

        vec![
            ("req.hits", hits),
            ("req.hits.info", load(&self.info.hits)),
            ("req.hits.stat", load(&self.stat.hits)),
            ("req.time", time),
            ("req.time.info", load(&self.info.time_us)),
            ("req.time.stat", load(&self.stat.time_us)),
            ("req.ttfb.info", load(&self.info.ttfb_us)),
            ("req.ttfb.stat", load(&self.stat.ttfb_us)),
            ("rep.hits.2xx", load(&self.hits_2xx)),
            ("rep.hits.4xx", load(&self.hits_4xx)),
            ("rep.hits.5xx", load(&self.hits_5xx)),
            ("rep.hits.405", load(&self.hits_405)),
            ("rep.hits.503", load(&self.hits_503)),
            ("rep.bread", load(&self.bytes_read)),
            ("rep.bwritten", load(&self.bytes_written)),
        ]
    }
}
