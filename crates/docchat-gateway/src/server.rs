use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use docchat_llm::AnyProvider;
use docchat_parse::ParseClient;
use docchat_store::VectorStore;
use tokio::sync::watch;

use crate::error::GatewayError;
use crate::router::build_router;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub provider: AnyProvider,
    pub store: Arc<dyn VectorStore>,
    pub parser: ParseClient,
    pub collection: String,
    pub vector_size: u64,
    pub top_k: u64,
    pub batch_size: usize,
    pub started_at: Instant,
}

pub struct GatewayServer {
    addr: SocketAddr,
    max_body_size: usize,
    state: AppState,
    shutdown_rx: watch::Receiver<bool>,
}

impl GatewayServer {
    #[must_use]
    pub fn new(
        bind: &str,
        port: u16,
        state: AppState,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        let addr: SocketAddr = format!("{bind}:{port}").parse().unwrap_or_else(|e| {
            tracing::warn!("invalid bind '{bind}': {e}, falling back to 127.0.0.1:{port}");
            SocketAddr::from(([127, 0, 0, 1], port))
        });

        if bind == "0.0.0.0" {
            tracing::warn!("gateway binding to 0.0.0.0 — ensure this is intended for production");
        }

        Self {
            addr,
            max_body_size: 10 * 1024 * 1024,
            state,
            shutdown_rx,
        }
    }

    #[must_use]
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Start the HTTP server.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or encounters a fatal
    /// I/O error.
    pub async fn serve(self) -> Result<(), GatewayError> {
        let router = build_router(self.state, self.max_body_size);

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| GatewayError::Bind(self.addr.to_string(), e))?;
        tracing::info!("gateway listening on {}", self.addr);

        let mut shutdown_rx = self.shutdown_rx;
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                while !*shutdown_rx.borrow_and_update() {
                    if shutdown_rx.changed().await.is_err() {
                        std::future::pending::<()>().await;
                    }
                }
                tracing::info!("gateway shutting down");
            })
            .await
            .map_err(|e| GatewayError::Server(format!("{e}")))?;

        Ok(())
    }
}
