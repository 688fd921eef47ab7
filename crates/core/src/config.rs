//! Client runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into controllers and the data-access layer. Nothing in the core reads environment
//! variables while handling a user action.

use crate::constants::{DEFAULT_API_URL, DEFAULT_TOKEN_FILE, GEOCODE_DEBOUNCE};
use crate::error::PreconditionError;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How a controller brings its collection up to date after a successful mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Re-issue the full list request and replace the collection wholesale.
    #[default]
    Reload,
    /// Upsert the returned record (or remove the deleted id) without a round trip.
    Patch,
}

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    api_url: String,
    token_file: PathBuf,
    geocode_debounce: Duration,
    sync_mode: SyncMode,
    request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// The API URL must be an absolute `http` or `https` URL; a trailing slash is dropped so
    /// request paths can be appended with a single `/`.
    pub fn new(api_url: impl Into<String>, token_file: PathBuf) -> Result<Self, PreconditionError> {
        let api_url = api_url.into();
        let trimmed = api_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(PreconditionError::new(format!(
                "API URL must start with http:// or https:// (got {api_url:?})"
            )));
        }

        Ok(Self {
            api_url: trimmed.to_owned(),
            token_file,
            geocode_debounce: GEOCODE_DEBOUNCE,
            sync_mode: SyncMode::default(),
            request_timeout: None,
        })
    }

    pub fn with_geocode_debounce(mut self, window: Duration) -> Self {
        self.geocode_debounce = window;
        self
    }

    pub fn with_sync_mode(mut self, mode: SyncMode) -> Self {
        self.sync_mode = mode;
        self
    }

    /// Requests have no timeout unless one is set here.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn token_file(&self) -> &Path {
        &self.token_file
    }

    pub fn geocode_debounce(&self) -> Duration {
        self.geocode_debounce
    }

    pub fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            geocode_debounce: GEOCODE_DEBOUNCE,
            sync_mode: SyncMode::default(),
            request_timeout: None,
        }
    }
}

/// Parse a sync mode from an optional environment value.
///
/// `None` or an empty value gives the default (`reload`).
pub fn sync_mode_from_env_value(value: Option<String>) -> Result<SyncMode, PreconditionError> {
    let Some(raw) = value else {
        return Ok(SyncMode::default());
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "reload" => Ok(SyncMode::Reload),
        "patch" => Ok(SyncMode::Patch),
        other => Err(PreconditionError::new(format!(
            "unsupported sync mode {other:?} (expected \"reload\" or \"patch\")"
        ))),
    }
}

/// Parse a millisecond duration from an optional environment value.
pub fn millis_from_env_value(
    name: &str,
    value: Option<String>,
) -> Result<Option<Duration>, PreconditionError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| {
                PreconditionError::new(format!("{name} must be a number of milliseconds"))
            }),
    }
}
