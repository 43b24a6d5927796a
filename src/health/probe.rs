//! Active volume probing.
//!
//! # Responsibilities
//! - Periodically write then remove a probe file inside the volume
//! - Update the shared IO health state from the outcome

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time;

use crate::config::HealthConfig;
use crate::health::state::IoHealth;
use crate::health::HealthCheck;
use crate::observability::metrics;

const PROBE_PAYLOAD: &[u8] = b"probe";

pub struct VolumeProbe {
    probe_path: PathBuf,
    health: Arc<IoHealth>,
    config: HealthConfig,
}

impl VolumeProbe {
    pub fn new(volume: &Path, health: Arc<IoHealth>, config: HealthConfig) -> Self {
        Self {
            probe_path: volume.join(&config.probe_file),
            health,
            config,
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!("Volume probe disabled");
            return;
        }

        tracing::info!(
            interval = self.config.interval_secs,
            probe = ?self.probe_path,
            "Volume probe starting"
        );

        let mut ticker = time::interval(Duration::from_secs(self.config.interval_secs));

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Volume probe received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Run one probe and fold its outcome into the health state.
    pub async fn check(&self) -> bool {
        let ok = match probe_once(&self.probe_path).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(probe = ?self.probe_path, error = %e, "Volume probe failed");
                false
            }
        };

        if ok {
            if self.health.mark_success() {
                tracing::info!(probe = ?self.probe_path, "Volume back to healthy");
            }
        } else if self.health.mark_failure() {
            tracing::error!(probe = ?self.probe_path, "Volume marked unhealthy");
        }

        metrics::record_volume_health(self.health.is_io_ok());
        ok
    }
}

async fn probe_once(path: &Path) -> std::io::Result<()> {
    tokio::fs::write(path, PROBE_PAYLOAD).await?;
    tokio::fs::remove_file(path).await
}
