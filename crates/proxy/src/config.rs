//! Proxy configuration, resolved once at startup.

use crate::{ProxyError, ProxyResult};
use axum::http::uri::{Authority, Scheme, Uri};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_FRONTEND_BUILD_DIR: &str = "./frontend/build";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyConfig {
    port: u16,
    backend_url: String,
    authority: Authority,
    frontend_dir: PathBuf,
}

impl ProxyConfig {
    /// `backend_url` must be an absolute `http` or `https` URL. A trailing slash is dropped.
    pub fn new(port: u16, backend_url: &str, frontend_dir: PathBuf) -> ProxyResult<Self> {
        let trimmed = backend_url.trim().trim_end_matches('/');
        let uri: Uri = trimmed
            .parse()
            .map_err(|_| ProxyError::InvalidBackendUrl(backend_url.to_owned()))?;

        let scheme_ok = uri.scheme() == Some(&Scheme::HTTP) || uri.scheme() == Some(&Scheme::HTTPS);
        let authority = match uri.authority() {
            Some(authority) if scheme_ok => authority.clone(),
            _ => return Err(ProxyError::InvalidBackendUrl(backend_url.to_owned())),
        };

        Ok(Self {
            port,
            backend_url: trimmed.to_owned(),
            authority,
            frontend_dir,
        })
    }

    /// Build from raw `PORT`, `BACKEND_URL` and `FRONTEND_BUILD_DIR` values.
    ///
    /// Missing or blank values take the defaults.
    pub fn from_env_values(
        port: Option<String>,
        backend_url: Option<String>,
        frontend_dir: Option<String>,
    ) -> ProxyResult<Self> {
        let port = match non_blank(port) {
            None => DEFAULT_PORT,
            Some(raw) => raw.parse().map_err(|_| ProxyError::InvalidPort(raw))?,
        };
        let backend_url = non_blank(backend_url).unwrap_or_else(|| DEFAULT_BACKEND_URL.to_owned());
        let frontend_dir =
            non_blank(frontend_dir).unwrap_or_else(|| DEFAULT_FRONTEND_BUILD_DIR.to_owned());

        Self::new(port, &backend_url, PathBuf::from(frontend_dir))
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// `host[:port]` of the backend, sent as the `Host` of forwarded requests.
    pub fn backend_authority(&self) -> &Authority {
        &self.authority
    }

    pub fn frontend_dir(&self) -> &Path {
        &self.frontend_dir
    }

    pub fn index_file(&self) -> PathBuf {
        self.frontend_dir.join("index.html")
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_values() {
        let cfg = ProxyConfig::from_env_values(None, Some("  ".into()), None).unwrap();
        assert_eq!(cfg.port(), 3000);
        assert_eq!(cfg.backend_url(), "http://localhost:5000");
        assert_eq!(cfg.backend_authority().as_str(), "localhost:5000");
        assert_eq!(cfg.index_file(), PathBuf::from("./frontend/build/index.html"));
    }

    #[test]
    fn backend_must_be_absolute_http() {
        for bad in ["localhost:5000", "ftp://files.local", "/api", "http://"] {
            assert!(
                matches!(
                    ProxyConfig::new(3000, bad, PathBuf::from("build")),
                    Err(ProxyError::InvalidBackendUrl(_))
                ),
                "{bad} should be rejected"
            );
        }
        let cfg =
            ProxyConfig::new(80, "https://api.clinic.local/", PathBuf::from("build")).unwrap();
        assert_eq!(cfg.backend_url(), "https://api.clinic.local");
    }

    #[test]
    fn port_must_be_numeric() {
        let err = ProxyConfig::from_env_values(Some("eighty".into()), None, None).unwrap_err();
        assert!(matches!(err, ProxyError::InvalidPort(ref p) if p == "eighty"));
    }
}
