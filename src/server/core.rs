use axum::Router;
use log::{error, info, warn};
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::server::routes::build_router;
use crate::storage::{FileGateway, Root};

pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    /// Prepares the root directory, builds the gateway, and binds the listener.
    pub async fn new(config: &ServerConfig) -> Result<Self, ServerError> {
        let root_path = config.server_root_path();

        if let Err(e) = tokio::fs::create_dir_all(&root_path).await {
            warn!("Failed to create server root directory: {}", e);
        }

        let root = Root::new(&root_path)
            .map_err(|e| ServerError::InvalidRoot(config.server_root.clone(), e))?;
        info!("Server root directory: {}", root.path().display());

        let gateway = FileGateway::new(root, config.operation_timeout());
        let router = build_router(gateway, config.max_content_bytes);

        let address = config.socket_address();
        let listener = match TcpListener::bind(&address).await {
            Ok(listener) => {
                info!("Server bound to {}", address);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", address, e);
                return Err(ServerError::Bind(address, e));
            }
        };

        Ok(Self { listener, router })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves requests until Ctrl+C. Each connection runs on its own task.
    pub async fn start(self) -> Result<(), ServerError> {
        info!("Starting RAX file gateway on {}", self.local_addr()?);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
