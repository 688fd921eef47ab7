//! # deskhub Proxy
//!
//! One origin for the browser: `/api` and `/socket.io` go to the backend, everything else is the
//! static single-page bundle.
//!
//! ## Routing
//! - a path under a [`PROXIED_PREFIXES`] entry is forwarded with its full path and query
//! - an existing file under the build directory is served
//! - any other `GET` gets `index.html`, or `404 Not found` when there is none
//!
//! A backend that cannot be reached answers `502 Bad gateway`.

mod config;
mod forward;
mod spa;

pub use config::{ProxyConfig, DEFAULT_BACKEND_URL, DEFAULT_FRONTEND_BUILD_DIR, DEFAULT_PORT};
pub use forward::{is_proxied, PROXIED_PREFIXES};

use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use axum::Router;
use forward::Upstream;
use spa::StaticFiles;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::trace::TraceLayer;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("invalid PORT value: {0}")]
    InvalidPort(String),
    #[error("BACKEND_URL must be an absolute http(s) URL, got {0:?}")]
    InvalidBackendUrl(String),
    #[error("proxy server failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type ProxyResult<T> = std::result::Result<T, ProxyError>;

struct ProxyState {
    upstream: Upstream,
    files: StaticFiles,
}

/// The proxy as an axum router, ready to serve or to drive with `oneshot` in tests.
pub fn router(config: &ProxyConfig) -> Router {
    let state = Arc::new(ProxyState {
        upstream: Upstream::new(config),
        files: spa::static_files(config.frontend_dir(), config.index_file()),
    });

    Router::new()
        .fallback(dispatch)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn dispatch(State(state): State<Arc<ProxyState>>, req: Request) -> Response {
    if is_proxied(req.uri().path()) {
        return state.upstream.forward(req).await;
    }
    match state.files.clone().oneshot(req).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// Bind `0.0.0.0:{port}` and serve until the process exits.
pub async fn serve(config: ProxyConfig) -> ProxyResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port()));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Reverse proxy listening on http://localhost:{}", config.port());
    tracing::info!("Proxying /api -> {}", config.backend_url());
    tracing::info!("Serving frontend from {}", config.frontend_dir().display());

    axum::serve(listener, router(&config)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::any;
    use http_body_util::BodyExt;
    use std::path::Path;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn build_dir(with_index: bool) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        if with_index {
            std::fs::write(dir.path().join("index.html"), "<div id=\"root\"></div>").unwrap();
        }
        std::fs::create_dir_all(dir.path().join("static/js")).unwrap();
        std::fs::write(dir.path().join("static/js/main.js"), "console.log(1)").unwrap();
        dir
    }

    fn config(backend: &str, dir: &Path) -> ProxyConfig {
        ProxyConfig::new(0, backend, dir.to_path_buf()).unwrap()
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// Backend that echoes what it received, plus an upgrade endpoint that echoes raw bytes.
    async fn spawn_backend() -> String {
        async fn echo(req: Request) -> Response {
            let host = req
                .headers()
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_owned();
            let target = req.uri().path_and_query().map(|pq| pq.to_string()).unwrap_or_default();
            format!("{} {target} host={host}", req.method()).into_response()
        }

        async fn upgrade(mut req: Request) -> Response {
            let on_upgrade = hyper::upgrade::on(&mut req);
            tokio::spawn(async move {
                let upgraded = on_upgrade.await.unwrap();
                let mut io = hyper_util::rt::TokioIo::new(upgraded);
                let mut buf = [0u8; 5];
                io.read_exact(&mut buf).await.unwrap();
                io.write_all(&buf).await.unwrap();
            });
            axum::http::Response::builder()
                .status(StatusCode::SWITCHING_PROTOCOLS)
                .header(header::CONNECTION, "upgrade")
                .header(header::UPGRADE, "echo")
                .body(Body::empty())
                .unwrap()
        }

        let app = Router::new()
            .route("/socket.io/", any(upgrade))
            .fallback(echo);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn serves_existing_files() {
        let dir = build_dir(true);
        let app = router(&config("http://127.0.0.1:9", dir.path()));
        let (status, body) = get(app, "/static/js/main.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "console.log(1)");
    }

    #[tokio::test]
    async fn unknown_paths_fall_back_to_index() {
        let dir = build_dir(true);
        let app = router(&config("http://127.0.0.1:9", dir.path()));
        for path in ["/", "/dental/patients", "/cloud/folders/4"] {
            let (status, body) = get(app.clone(), path).await;
            assert_eq!(status, StatusCode::OK, "{path}");
            assert_eq!(body, "<div id=\"root\"></div>");
        }
    }

    #[tokio::test]
    async fn missing_index_is_not_found() {
        let dir = build_dir(false);
        let app = router(&config("http://127.0.0.1:9", dir.path()));
        let (status, body) = get(app, "/dashboard").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not found");
    }

    #[tokio::test]
    async fn api_requests_keep_path_and_query_and_rewrite_host() {
        let backend = spawn_backend().await;
        let dir = build_dir(true);
        let app = router(&config(&backend, dir.path()));

        let (status, body) = get(app, "/api/cloud/folders?user_id=7&parent_id=").await;
        let authority = backend.trim_start_matches("http://");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            format!("GET /api/cloud/folders?user_id=7&parent_id= host={authority}")
        );
    }

    #[tokio::test]
    async fn unreachable_backend_is_bad_gateway() {
        let dir = build_dir(true);
        let app = router(&config("http://127.0.0.1:9", dir.path()));
        let (status, _) = get(app, "/api/auth/verify").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn https_backends_are_dialled() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let dir = build_dir(true);
        let app = router(&config(&format!("https://{addr}"), dir.path()));

        let request = tokio::spawn(get(app, "/api/auth/verify"));
        let accepted =
            tokio::time::timeout(std::time::Duration::from_secs(5), listener.accept()).await;
        assert!(matches!(accepted, Ok(Ok(_))), "backend was never contacted");
        // Closing the socket mid-handshake fails the TLS setup.
        drop(accepted);

        let (status, _) = request.await.unwrap();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn upgraded_connections_are_tunnelled() {
        let backend = spawn_backend().await;
        let dir = build_dir(true);
        let app = router(&config(&backend, dir.path()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let proxy_addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let mut stream = tokio::net::TcpStream::connect(proxy_addr).await.unwrap();
        stream
            .write_all(
                b"GET /socket.io/?EIO=4&transport=websocket HTTP/1.1\r\n\
                  Host: localhost\r\n\
                  Connection: Upgrade\r\n\
                  Upgrade: echo\r\n\r\n",
            )
            .await
            .unwrap();

        let mut head = Vec::new();
        while !head.ends_with(b"\r\n\r\n") {
            let mut byte = [0u8; 1];
            stream.read_exact(&mut byte).await.unwrap();
            head.push(byte[0]);
        }
        let head = String::from_utf8(head).unwrap();
        assert!(head.starts_with("HTTP/1.1 101"), "{head}");

        stream.write_all(b"hello").await.unwrap();
        let mut echoed = [0u8; 5];
        stream.read_exact(&mut echoed).await.unwrap();
        assert_eq!(&echoed, b"hello");
    }
}
