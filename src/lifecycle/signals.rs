//! OS signal handling.
//!
//! - SIGTERM / SIGINT: graceful shutdown
//! - SIGUSR1: access log on
//! - SIGUSR2: access log off

use std::sync::Arc;

use crate::lifecycle::Shutdown;
use crate::observability::Verbosity;

/// Wait for signals until a shutdown is requested, then trigger it.
#[cfg(unix)]
pub async fn handle_signals(shutdown: Arc<Shutdown>, verbosity: Arc<Verbosity>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigusr1 = signal(SignalKind::user_defined1())?;
    let mut sigusr2 = signal(SignalKind::user_defined2())?;

    loop {
        tokio::select! {
            _ = sigterm.recv() => {
                tracing::info!("SIGTERM received");
                break;
            }
            _ = sigint.recv() => {
                tracing::info!("SIGINT received");
                break;
            }
            _ = sigusr1.recv() => {
                verbosity.set(true);
            }
            _ = sigusr2.recv() => {
                verbosity.set(false);
            }
        }
    }

    shutdown.trigger();
    Ok(())
}

#[cfg(not(unix))]
pub async fn handle_signals(shutdown: Arc<Shutdown>, _verbosity: Arc<Verbosity>) -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::info!("Ctrl+C received");
    shutdown.trigger();
    Ok(())
}
