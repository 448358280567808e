use tracing::{error, info};

/// Resolves once the process is asked to shut down.
pub async fn wait_for_signal() {
    if let Err(why) = shutdown_request().await {
        error!("Failed to listen for shutdown signals: {:?}", why);
        // Nothing to wait for without a listener. Park this branch so
        // the client keeps running.
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(unix)]
async fn shutdown_request() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res,
        _ = sigterm.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn shutdown_request() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
