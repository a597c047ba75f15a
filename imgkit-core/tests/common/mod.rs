//! Loopback HTTP server serving canned image responses

#![allow(dead_code)]

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::time::Duration;

pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n-fake-png-body";
pub const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0-fake-jpeg-body";
pub const GIF_BYTES: &[u8] = b"GIF89a-fake-gif-body";

/// Running test server
pub struct TestServer {
    addr: SocketAddr,
}

impl TestServer {
    /// Start the server on an ephemeral port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/cat.png", get(png))
            .route("/dog.png", get(png))
            .route("/photo.JPG", get(jpeg))
            .route("/anim", get(gif))
            .route("/missing.png", get(not_found))
            .route("/page.html", get(html))
            .route("/empty.png", get(empty))
            .route("/ua.png", get(echo_user_agent))
            .route("/slow.png", get(slow));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr }
    }

    /// Absolute URL for `path`
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

async fn png() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/png")], PNG_BYTES)
}

async fn jpeg() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "IMAGE/JPEG")], JPEG_BYTES)
}

async fn gif() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/gif")], GIF_BYTES)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not here")
}

async fn html() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html")], "<html></html>")
}

async fn empty() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/png")], "")
}

/// Serves the request's User-Agent as the image body
async fn echo_user_agent(headers: HeaderMap) -> impl IntoResponse {
    let agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("none")
        .to_string();
    ([(header::CONTENT_TYPE, "image/png")], agent)
}

async fn slow() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(5)).await;
    ([(header::CONTENT_TYPE, "image/png")], PNG_BYTES)
}

/// A loopback URL whose port refuses connections
pub async fn refused_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/x.png", addr)
}
