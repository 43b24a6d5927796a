//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the info and stat handlers
//! - Wire up middleware (tracing, request ID propagation)
//! - Serve the plain listener and the optional TLS listener
//! - Start the volume probe and apply configuration reloads

use axum::{routing::any, Extension, Router};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tower_http::{request_id::PropagateRequestIdLayer, trace::TraceLayer};

use crate::config::{LimitsConfig, NodeConfig, NodeIdentity, TlsConfig};
use crate::health::{HealthCheck, IoHealth, VolumeProbe};
use crate::http::info::info_handler;
use crate::http::request::ListenerInfo;
use crate::http::stat::stat_handler;
use crate::net::tls::{load_tls_config, TlsError};
use crate::observability::{AccessLogSink, NodeStats, StatsRecorder, TracingAccessLog, Verbosity};

/// Time given to in-flight TLS requests once shutdown starts.
const TLS_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<NodeIdentity>,
    pub health: Arc<dyn HealthCheck>,
    pub stats: Arc<dyn StatsRecorder>,
    pub access_log: Arc<dyn AccessLogSink>,
    pub verbosity: Arc<Verbosity>,
    pub limits: LimitsConfig,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TLS bind address: {0}")]
    TlsAddress(String),

    #[error(transparent)]
    Tls(#[from] TlsError),
}

/// HTTP server of a storage node.
pub struct HttpServer {
    config: NodeConfig,
    state: AppState,
    io_health: Arc<IoHealth>,
}

impl HttpServer {
    /// Create a new HTTP server with the production collaborators.
    pub fn new(config: NodeConfig) -> Self {
        let io_health = Arc::new(IoHealth::new(
            config.health.healthy_threshold,
            config.health.unhealthy_threshold,
        ));

        let state = AppState {
            identity: Arc::new(config.node.clone()),
            health: io_health.clone(),
            stats: Arc::new(NodeStats::new()),
            access_log: Arc::new(TracingAccessLog),
            verbosity: Arc::new(Verbosity::new(config.observability.verbose)),
            limits: config.limits.clone(),
        };

        Self { config, state, io_health }
    }

    /// Shared handler state, e.g. for signal handlers toggling verbosity.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The request timeout bounds the body drain inside the handlers, so a
    /// slow request still reaches accounting. Handlers echo their request ID;
    /// the propagate layer covers the unrouted 404s.
    pub fn build_router(state: AppState, listener: ListenerInfo) -> Router {
        Router::new()
            .route("/info", any(info_handler))
            .route("/info/", any(info_handler))
            .route("/stat", any(stat_handler))
            .with_state(state)
            .layer(Extension(listener))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<NodeConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            namespace = %self.config.node.namespace,
            volume = %self.config.node.volume,
            "HTTP server starting"
        );

        let probe = VolumeProbe::new(
            Path::new(&self.config.node.volume),
            self.io_health.clone(),
            self.config.health.clone(),
        );
        tokio::spawn(probe.run(shutdown.resubscribe()));

        let reload_state = self.state.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                apply_reload(&reload_state, &new_config);
            }
        });

        let tls_task = match &self.config.listener.tls {
            Some(tls) => Some(self.spawn_tls(tls, shutdown.resubscribe()).await?),
            None => None,
        };

        let app = Self::build_router(
            self.state.clone(),
            ListenerInfo { local_addr: addr, tls: false },
        )
        .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        if let Some(task) = tls_task {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!(error = %e, "TLS listener failed"),
                Err(e) => tracing::error!(error = %e, "TLS listener task aborted"),
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    async fn spawn_tls(
        &self,
        tls: &TlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<JoinHandle<std::io::Result<()>>, ServerError> {
        let addr: SocketAddr = tls
            .bind_address
            .parse()
            .map_err(|_| ServerError::TlsAddress(tls.bind_address.clone()))?;
        let rustls = load_tls_config(tls).await?;

        let app = Self::build_router(
            self.state.clone(),
            ListenerInfo { local_addr: addr, tls: true },
        )
        .into_make_service_with_connect_info::<SocketAddr>();

        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            shutdown_handle.graceful_shutdown(Some(TLS_GRACE_PERIOD));
        });

        tracing::info!(address = %addr, "TLS listener starting");
        Ok(tokio::spawn(
            axum_server::bind_rustls(addr, rustls).handle(handle).serve(app),
        ))
    }
}

/// Apply the live-reloadable part of a new configuration.
pub fn apply_reload(state: &AppState, new_config: &NodeConfig) {
    state.verbosity.set(new_config.observability.verbose);
    if *state.identity != new_config.node {
        tracing::warn!(
            namespace = %new_config.node.namespace,
            volume = %new_config.node.volume,
            "Node identity changed on disk, restart required to apply it"
        );
    }
}
