//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy handler on every path
//! - Wire up request tracing
//! - Bind server to listener
//! - Graceful shutdown on Ctrl+C

use axum::{
    body::Body,
    extract::State,
    http::{Request, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::proxy::ForwardingProxy;

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around a constructed proxy.
    pub fn new(proxy: ForwardingProxy) -> Self {
        let router = Self::build_router(Arc::new(proxy));
        Self { router }
    }

    fn build_router(proxy: Arc<ForwardingProxy>) -> Router {
        Router::new()
            .route("/", get(proxy_handler))
            .route("/{*path}", get(proxy_handler))
            .with_state(proxy)
            .layer(TraceLayer::new_for_http())
    }

    /// The configured router, for serving in-process.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn proxy_handler(
    State(proxy): State<Arc<ForwardingProxy>>,
    request: Request<Body>,
) -> Response<Body> {
    tracing::debug!(
        path = %request.uri().path(),
        query = request.uri().query().unwrap_or(""),
        "Proxying request"
    );
    proxy.handle(request).await
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
