//! Authentication session and the persisted bearer credential.
//!
//! The credential lives in a [`CredentialStore`] and is read on every authenticated request, so
//! a login or logout takes effect on the very next call. [`AuthSession`] is constructed at
//! startup and handed to whatever needs to know who is logged in.

use crate::error::{SessionError, SessionResult, TransportError};
use crate::notify::{Notification, Notifier};
use async_trait::async_trait;
use deskhub_types::{NonEmptyText, RecordId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// The single persisted credential slot.
///
/// Read-many, write-rare; no locking across processes.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> SessionResult<Option<String>>;
    fn store(&self, token: &str) -> SessionResult<()>;
    fn clear(&self) -> SessionResult<()>;
}

/// Credential kept in a file, re-read on every [`load`](CredentialStore::load).
#[derive(Clone, Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> SessionResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_owned()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::Read(e)),
        }
    }

    fn store(&self, token: &str) -> SessionResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(SessionError::Write)?;
        }
        fs::write(&self.path, token).map_err(SessionError::Write)
    }

    fn clear(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Remove(e)),
        }
    }
}

/// Credential held in memory only.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> SessionResult<Option<String>> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn store(&self, token: &str) -> SessionResult<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// The logged-in user as returned by `/auth/login` and `/auth/verify`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("unknown user")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// The authentication endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// A rejected login is [`SessionError::Rejected`] with the server's message.
    async fn login(
        &self,
        identifier: &NonEmptyText,
        password: &str,
    ) -> SessionResult<LoginResponse>;

    /// `Ok(None)` when the backend refuses the token.
    async fn verify(&self, token: &str) -> Result<Option<UserProfile>, TransportError>;
}

pub struct AuthSession<A: AuthApi + ?Sized> {
    api: Arc<A>,
    store: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
    user: Option<UserProfile>,
}

impl<A: AuthApi + ?Sized> AuthSession<A> {
    pub fn new(api: Arc<A>, store: Arc<dyn CredentialStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            store,
            notifier,
            user: None,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn credentials(&self) -> Arc<dyn CredentialStore> {
        self.store.clone()
    }

    pub async fn login(
        &mut self,
        identifier: &NonEmptyText,
        password: &str,
    ) -> SessionResult<&UserProfile> {
        match self.api.login(identifier, password).await {
            Ok(response) => {
                self.store.store(&response.token)?;
                tracing::info!(user = response.user.display_name(), "logged in");
                self.notifier.notify(Notification::success("Login successful!"));
                Ok(&*self.user.insert(response.user))
            }
            Err(SessionError::Rejected(message)) => {
                self.notifier.notify(Notification::error(message.clone()));
                Err(SessionError::Rejected(message))
            }
            Err(e) => {
                self.notifier
                    .notify(Notification::error(crate::constants::CONNECTION_ERROR_MESSAGE));
                Err(e)
            }
        }
    }

    /// Restore the session from the stored credential.
    ///
    /// A token the backend refuses, or one that cannot be checked, is cleared.
    pub async fn restore(&mut self) -> SessionResult<Option<&UserProfile>> {
        let Some(token) = self.store.load()? else {
            self.user = None;
            return Ok(None);
        };

        match self.api.verify(&token).await {
            Ok(Some(user)) => Ok(Some(&*self.user.insert(user))),
            Ok(None) => {
                tracing::info!("stored credential rejected, clearing it");
                self.store.clear()?;
                self.user = None;
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not verify stored credential, clearing it");
                self.store.clear()?;
                self.user = None;
                Ok(None)
            }
        }
    }

    pub fn logout(&mut self) -> SessionResult<()> {
        self.store.clear()?;
        self.user = None;
        self.notifier.notify(Notification::info("Logged out successfully"));
        Ok(())
    }
}
