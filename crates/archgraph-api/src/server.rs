use crate::{create_router, AppState};
use archgraph_core::{ConfigManager, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

pub struct Server {
    state: AppState,
    host: String,
    port: u16,
}

impl Server {
    pub fn new(config: Arc<ConfigManager>) -> Result<Self> {
        let host = config.config().server.host.clone();
        let port = config.config().server.port;
        let state = AppState::new(config)?;
        Ok(Self { state, host, port })
    }

    pub async fn run(self) -> Result<()> {
        let router = create_router(self.state);

        let listener = TcpListener::bind((self.host.as_str(), self.port)).await?;
        let addr = listener.local_addr()?;

        info!("ArchGraph API listening on http://{}", addr);
        info!("  GET    /health");
        info!("  POST   {}/analyze", crate::routes::PROJECTION_PREFIX);
        info!("  POST   {}/validate", crate::routes::PROJECTION_PREFIX);
        info!("  GET    {}", crate::routes::PROJECTION_PREFIX);
        info!("  GET    {}/{{id}}", crate::routes::PROJECTION_PREFIX);
        info!("  GET    {}/{{id}}/export", crate::routes::PROJECTION_PREFIX);
        info!("  DELETE {}/{{id}}", crate::routes::PROJECTION_PREFIX);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}
