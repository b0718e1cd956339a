//! Liveness endpoint for external uptime monitors.
//!
//! Runs on its own OS thread with its own runtime and shares nothing with the
//! scheduler; it only ever serves a constant string.

use axum::{routing::get, Router};
use std::net::SocketAddr;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Body returned by `GET /`.
pub const LIVENESS_BODY: &str = "Bot is alive!";

#[derive(Error, Debug)]
pub enum LivenessError {
    #[error("Liveness endpoint I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Create the liveness router. Only `/` is routed.
pub fn liveness_router() -> Router {
    Router::new()
        .route("/", get(alive_handler))
        .layer(TraceLayer::new_for_http())
}

async fn alive_handler() -> &'static str {
    LIVENESS_BODY
}

/// Handle to the running liveness endpoint.
pub struct LivenessServer {
    local_addr: SocketAddr,
}

impl LivenessServer {
    /// Bind `addr` and start serving on a dedicated thread.
    ///
    /// Binding happens before this returns, so address conflicts are
    /// reported to the caller.
    pub fn start(addr: SocketAddr) -> Result<Self, LivenessError> {
        let listener = std::net::TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;

        std::thread::Builder::new()
            .name("liveness".to_string())
            .spawn(move || serve_blocking(listener))?;

        info!("Liveness endpoint listening on http://{}", local_addr);
        Ok(Self { local_addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

fn serve_blocking(listener: std::net::TcpListener) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to build liveness runtime: {}", e);
            return;
        }
    };

    runtime.block_on(async move {
        let listener = match tokio::net::TcpListener::from_std(listener) {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to register liveness listener: {}", e);
                return;
            }
        };

        if let Err(e) = axum::serve(listener, liveness_router()).await {
            error!("Liveness server error: {}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_local() -> LivenessServer {
        LivenessServer::start(SocketAddr::from(([127, 0, 0, 1], 0))).unwrap()
    }

    #[tokio::test]
    async fn test_root_returns_fixed_body() {
        let server = start_local();

        let response = reqwest::get(format!("http://{}/", server.local_addr()))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), LIVENESS_BODY);
    }

    #[tokio::test]
    async fn test_other_routes_not_found() {
        let server = start_local();
        let response = reqwest::get(format!("http://{}/health", server.local_addr()))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_bind_conflict_reported() {
        let first = start_local();
        let second = LivenessServer::start(first.local_addr());
        assert!(matches!(second, Err(LivenessError::Io(_))));
    }
}
