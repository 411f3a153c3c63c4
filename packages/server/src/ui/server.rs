//! Server execution logic.

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{Router, routing::get};
use tokio::{net::TcpListener, sync::watch};
use tower_http::trace::TraceLayer;

use crate::usecase::{GetParticipantsUseCase, LifecycleCoordinator};

use super::{
    handler::{
        http::{get_participants, health_check},
        tcp::serve_lines,
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Listener configuration for [`Server::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind both listeners to (e.g., "127.0.0.1")
    pub host: String,
    /// Port for the HTTP API and the WebSocket endpoint
    pub port: u16,
    /// Port for the raw TCP line protocol, `None` to disable it
    pub tcp_port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            tcp_port: Some(9000),
        }
    }
}

/// Chat relay server
///
/// Serves the WebSocket transport and the HTTP API on one listener and,
/// optionally, the TCP line transport on a second one. Both transports
/// feed the same [`LifecycleCoordinator`].
///
/// # Example
///
/// ```ignore
/// let server = Server::new(coordinator, get_participants_usecase);
/// server.run(ServerConfig::default()).await?;
/// ```
pub struct Server {
    coordinator: Arc<LifecycleCoordinator>,
    get_participants_usecase: Arc<GetParticipantsUseCase>,
}

impl Server {
    pub fn new(
        coordinator: Arc<LifecycleCoordinator>,
        get_participants_usecase: Arc<GetParticipantsUseCase>,
    ) -> Self {
        Self {
            coordinator,
            get_participants_usecase,
        }
    }

    fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            coordinator: self.coordinator.clone(),
            get_participants_usecase: self.get_participants_usecase.clone(),
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/participants", get(get_participants))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Bind the configured listeners and serve until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if a listener cannot be bound or the HTTP server fails.
    pub async fn run(self, config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", config.host, config.port);
        let http_listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!(
            "WebSocket chat relay listening on {}",
            http_listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);

        let line_listener = match config.tcp_port {
            Some(tcp_port) => {
                let listener = TcpListener::bind((config.host.as_str(), tcp_port)).await?;
                tracing::info!("Line protocol listening on {}", listener.local_addr()?);
                Some(listener)
            }
            None => None,
        };
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(http_listener, line_listener, shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Serve on already bound listeners until `shutdown` resolves.
    pub async fn serve<F>(
        self,
        http_listener: TcpListener,
        line_listener: Option<TcpListener>,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // Fan the single shutdown future out to both listeners
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            shutdown.await;
            let _ = shutdown_tx.send(true);
        });

        let line_task = line_listener.map(|listener| {
            tokio::spawn(serve_lines(
                listener,
                self.coordinator.clone(),
                wait_for_shutdown(shutdown_rx.clone()),
            ))
        });

        let app = self.router();
        axum::serve(
            http_listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx))
        .await?;

        if let Some(line_task) = line_task
            && let Err(e) = line_task.await
        {
            tracing::error!("Line listener task failed: {}", e);
        }

        Ok(())
    }
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}
