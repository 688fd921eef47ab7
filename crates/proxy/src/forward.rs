//! Request forwarding to the backend origin.
//!
//! The full path and query are kept, `Host` is rewritten to the backend and hop-by-hop headers
//! are dropped. Upgrade requests (websockets) keep their `Connection`/`Upgrade` headers; once the
//! backend answers `101` the two upgraded connections are spliced together.
//! `https` backends are reached over rustls with the webpki root store.

use crate::config::ProxyConfig;
use axum::body::Body;
use axum::extract::Request;
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use hyper::upgrade::OnUpgrade;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioIo};

/// Path prefixes forwarded to the backend. Everything else is static content.
pub const PROXIED_PREFIXES: [&str; 2] = ["/api", "/socket.io"];

const HOP_BY_HOP: [&str; 7] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
];

/// `/api`, `/api/...`, `/socket.io`, `/socket.io/...`; never `/apidocs`.
pub fn is_proxied(path: &str) -> bool {
    PROXIED_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

#[derive(Clone)]
pub(crate) struct Upstream {
    client: Client<HttpsConnector<HttpConnector>, Body>,
    base_url: String,
    host: HeaderValue,
}

impl Upstream {
    pub(crate) fn new(config: &ProxyConfig) -> Self {
        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::<(), ()>::builder(TokioExecutor::new()).build(connector);
        // An `Authority` is always a valid header value.
        let host = HeaderValue::from_str(config.backend_authority().as_str())
            .unwrap_or_else(|_| HeaderValue::from_static("localhost"));
        Self {
            client,
            base_url: config.backend_url().to_owned(),
            host,
        }
    }

    fn target(&self, uri: &Uri) -> Option<Uri> {
        let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
        format!("{}{}", self.base_url, path_and_query).parse().ok()
    }

    pub(crate) async fn forward(&self, mut req: Request) -> Response {
        let Some(target) = self.target(req.uri()) else {
            return (StatusCode::BAD_REQUEST, "Bad request").into_response();
        };

        let upgrade = is_upgrade(req.headers());
        let client_side = upgrade.then(|| hyper::upgrade::on(&mut req));

        tracing::debug!(method = %req.method(), %target, upgrade, "forwarding");
        *req.uri_mut() = target;
        strip_hop_by_hop(req.headers_mut(), upgrade);
        req.headers_mut().insert(header::HOST, self.host.clone());

        let mut response = match self.client.request(req).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "backend request failed");
                return (StatusCode::BAD_GATEWAY, "Bad gateway").into_response();
            }
        };

        match client_side {
            Some(client_side) if response.status() == StatusCode::SWITCHING_PROTOCOLS => {
                let backend_side = hyper::upgrade::on(&mut response);
                tokio::spawn(tunnel(client_side, backend_side));
            }
            _ => strip_hop_by_hop(response.headers_mut(), false),
        }

        response.map(Body::new)
    }
}

fn is_upgrade(headers: &HeaderMap) -> bool {
    headers.contains_key(header::UPGRADE)
        && headers
            .get_all(header::CONNECTION)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .any(|token| token.trim().eq_ignore_ascii_case("upgrade"))
}

fn strip_hop_by_hop(headers: &mut HeaderMap, keep_upgrade: bool) {
    for name in HOP_BY_HOP {
        if keep_upgrade && name == "connection" {
            continue;
        }
        headers.remove(name);
    }
    if !keep_upgrade {
        headers.remove(header::UPGRADE);
    }
}

async fn tunnel(client_side: OnUpgrade, backend_side: OnUpgrade) {
    let (client_io, backend_io) = match tokio::try_join!(client_side, backend_side) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::warn!(error = %e, "upgrade failed");
            return;
        }
    };

    let mut client_io = TokioIo::new(client_io);
    let mut backend_io = TokioIo::new(backend_io);
    match tokio::io::copy_bidirectional(&mut client_io, &mut backend_io).await {
        Ok((up, down)) => tracing::debug!(up, down, "upgraded connection closed"),
        Err(e) => tracing::debug!(error = %e, "upgraded connection ended with error"),
    }
}
