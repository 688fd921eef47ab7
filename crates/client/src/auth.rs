use crate::client::HttpClient;
use async_trait::async_trait;
use deskhub_core::error::SessionResult;
use deskhub_core::session::{AuthApi, LoginResponse, UserProfile};
use deskhub_core::{NonEmptyText, SessionError, TransportError};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

const LOGIN_PATH: &str = "/auth/login";
const VERIFY_PATH: &str = "/auth/verify";
const LOGIN_FAILED: &str = "Login failed";

#[derive(Deserialize)]
struct VerifyResponse {
    user: UserProfile,
}

#[async_trait]
impl AuthApi for HttpClient {
    /// The identifier goes out as both `email` and `username`; the backend matches either.
    async fn login(
        &self,
        identifier: &NonEmptyText,
        password: &str,
    ) -> SessionResult<LoginResponse> {
        let body = json!({
            "email": identifier.as_str(),
            "username": identifier.as_str(),
            "password": password,
        });
        let reply = self.send(self.http.post(self.url(LOGIN_PATH)).json(&body)).await?;

        if reply.is_success() {
            let response = reply
                .into_body()
                .and_then(|body| serde_json::from_value::<LoginResponse>(body).ok())
                .ok_or_else(|| TransportError::connection("login response has no token"))?;
            return Ok(response);
        }

        match (reply.message(), reply.body()) {
            (Some(message), _) => Err(SessionError::Rejected(message.to_owned())),
            (None, Some(_)) => Err(SessionError::Rejected(LOGIN_FAILED.to_owned())),
            (None, None) => Err(reply.transport_error().into()),
        }
    }

    /// `Ok(None)` for 401 and 403; other failures are transport errors.
    async fn verify(&self, token: &str) -> Result<Option<UserProfile>, TransportError> {
        let reply = self
            .send(self.http.get(self.url(VERIFY_PATH)).bearer_auth(token))
            .await?;

        match reply.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => reply
                .into_body()
                .and_then(|body| serde_json::from_value::<VerifyResponse>(body).ok())
                .map(|verified| Some(verified.user))
                .ok_or_else(|| TransportError::connection("verify response has no user")),
            _ => Err(reply.transport_error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::mock::MockBackend;
    use deskhub_core::notify::{NotificationLog, Severity};
    use deskhub_core::session::{AuthApi, AuthSession, CredentialStore, MemoryCredentialStore};
    use deskhub_core::{ClientConfig, NonEmptyText, SessionError};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn admin() -> NonEmptyText {
        NonEmptyText::new("admin").unwrap()
    }

    #[tokio::test]
    async fn login_stores_token_used_by_later_requests() {
        let backend = MockBackend::spawn().await;
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
        let config =
            ClientConfig::new(backend.client().base_url(), PathBuf::from("unused")).unwrap();
        let client = Arc::new(crate::HttpClient::new(&config, store.clone()).unwrap());
        let log = Arc::new(NotificationLog::new());
        let mut session = AuthSession::new(client.clone(), store.clone(), log.clone());

        let user = session.login(&admin(), "s3cret").await.unwrap();
        assert_eq!(user.display_name(), "admin");
        assert_eq!(store.load().unwrap().as_deref(), Some("tok-1"));
        assert_eq!(log.last().unwrap().message, "Login successful!");

        let restored = session.restore().await.unwrap();
        assert!(restored.is_some());
    }

    #[tokio::test]
    async fn wrong_password_is_rejected_with_server_message() {
        let backend = MockBackend::spawn().await;
        let err = backend.client().login(&admin(), "nope").await.unwrap_err();
        assert!(matches!(err, SessionError::Rejected(ref m) if m == "Invalid credentials"));
    }

    #[tokio::test]
    async fn unstructured_login_failure_is_transport() {
        let backend = MockBackend::spawn().await;
        let log = Arc::new(NotificationLog::new());
        let store = Arc::new(MemoryCredentialStore::new());
        let mut session = AuthSession::new(Arc::new(backend.client()), store, log.clone());

        let err = session.login(&admin(), "crash").await.unwrap_err();
        assert!(matches!(err, SessionError::Transport(ref t) if t.status == Some(502)));
        let last = log.last().unwrap();
        assert_eq!(last.severity, Severity::Error);
        assert_eq!(last.message, "Error connecting to server");
    }

    #[tokio::test]
    async fn verify_distinguishes_refusal_from_failure() {
        let backend = MockBackend::spawn().await;
        let client = backend.client();
        assert!(client.verify("tok-1").await.unwrap().is_some());
        assert_eq!(client.verify("stale").await.unwrap(), None);
        assert_eq!(client.verify("tok-500").await.unwrap_err().status, Some(500));
    }

    #[tokio::test]
    async fn refused_token_is_cleared_on_restore() {
        let backend = MockBackend::spawn().await;
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::with_token("stale"));
        let mut session = AuthSession::new(
            Arc::new(backend.client()),
            store.clone(),
            Arc::new(NotificationLog::new()),
        );

        assert!(session.restore().await.unwrap().is_none());
        assert_eq!(store.load().unwrap(), None);
    }
}
