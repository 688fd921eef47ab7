use crate::response::Reply;
use deskhub_core::session::CredentialStore;
use deskhub_core::{ClientConfig, TransportError};
use reqwest::RequestBuilder;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// HTTP access to one deskhub API origin.
///
/// Cheap to clone; clones share the connection pool and the credential store.
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpClient {
    /// Build a client for `config.api_url()`.
    ///
    /// Requests time out only when the config sets a request timeout.
    pub fn new(config: &ClientConfig, credentials: Arc<dyn CredentialStore>) -> ClientResult<Self> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("deskhub/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.api_url().to_owned(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the stored bearer token, if there is one.
    ///
    /// An unreadable credential file sends the request anonymously; the backend decides.
    pub(crate) fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.load() {
            Ok(Some(token)) => request.bearer_auth(token),
            Ok(None) => request,
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored credential");
                request
            }
        }
    }

    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Reply, TransportError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "request failed before a response arrived");
            TransportError::connection(e.to_string())
        })?;
        Reply::read(response).await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
