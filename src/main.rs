//! RAX File Gateway - Entry Point
//!
//! Serves a confined directory tree over HTTP for a remote editor.

use log::{error, info};
use std::process::ExitCode;

use rax_file_gateway::Server;
use rax_file_gateway::config::ServerConfig;
use rax_file_gateway::error::ServerError;
use rax_file_gateway::middleware::logging::setup_logging;

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    info!("Launching file gateway...");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server terminated: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let config = ServerConfig::load()?;
    let server = Server::new(&config).await?;
    server.start().await
}
