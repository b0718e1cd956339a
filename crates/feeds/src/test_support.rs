//! Local HTTP fixtures for fetcher tests.

use axum::{http::StatusCode, routing::get, Router};
use std::time::Duration;

/// Serve a fixed response on `/` and return its URL.
pub(crate) async fn serve_fixture(status: StatusCode, body: &'static str) -> String {
    let app = Router::new().route("/", get(move || async move { (status, body) }));
    spawn(app).await
}

/// Serve a response that only arrives after `delay`.
pub(crate) async fn serve_slow(delay: Duration) -> String {
    let app = Router::new().route(
        "/",
        get(move || async move {
            tokio::time::sleep(delay).await;
            "{}"
        }),
    );
    spawn(app).await
}

/// A URL nothing is listening on.
pub(crate) async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}
