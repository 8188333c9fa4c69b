//! Server Implementation
//!
//! HTTP 服务器启动和管理

use crate::core::{Config, ServerState};
use crate::routes;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (e.g. shared with tests)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    /// 启动服务器，阻塞直到 Ctrl-C
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let app = routes::build_app(&state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.server_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(
            "🛒 Mall Server listening on {} ({})",
            listener.local_addr()?,
            self.config.environment
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down...");
}
