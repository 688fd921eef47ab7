use crate::client::HttpClient;
use async_trait::async_trait;
use deskhub_core::{ListQuery, MutationError, RecordId, ResourceApi, ResourcePath, TransportError};
use serde_json::Value;

#[async_trait]
impl ResourceApi for HttpClient {
    async fn list(
        &self,
        path: &ResourcePath,
        query: &ListQuery,
    ) -> Result<Vec<Value>, TransportError> {
        let url = self.url(&path.collection_path());
        tracing::debug!(%url, "GET");
        let request = self.authorize(self.http.get(url).query(query.pairs()));
        self.send(request).await?.into_list(path.collection_key())
    }

    async fn create(
        &self,
        path: &ResourcePath,
        body: Value,
    ) -> Result<Option<Value>, MutationError> {
        let url = self.url(&path.collection_path());
        tracing::debug!(%url, "POST");
        let request = self.authorize(self.http.post(url).json(&body));
        self.send(request).await?.into_mutation()
    }

    async fn update(
        &self,
        path: &ResourcePath,
        id: &RecordId,
        body: Value,
    ) -> Result<Option<Value>, MutationError> {
        let url = self.url(&path.item_path(id));
        tracing::debug!(%url, "PUT");
        let request = self.authorize(self.http.put(url).json(&body));
        self.send(request).await?.into_mutation()
    }

    async fn delete(&self, path: &ResourcePath, id: &RecordId) -> Result<(), TransportError> {
        let url = self.url(&path.item_path(id));
        tracing::debug!(%url, "DELETE");
        let request = self.authorize(self.http.delete(url));
        self.send(request).await?.into_unit()
    }
}

#[cfg(test)]
mod tests {
    use crate::mock::{self, MockBackend};
    use deskhub_core::notify::{NotificationLog, Severity};
    use deskhub_core::session::{CredentialStore, MemoryCredentialStore};
    use deskhub_core::{CollectionController, DeleteOutcome, OperationOutcome, RecordId};
    use deskhub_records::dental::{Appointments, Patients};
    use deskhub_records::supply::Products;
    use std::sync::Arc;

    #[tokio::test]
    async fn jane_doe_round_trip_through_http() {
        let backend = MockBackend::spawn().await;
        let client = Arc::new(backend.client());
        let log = Arc::new(NotificationLog::new());
        let mut patients = CollectionController::<Patients, _>::new(client, log.clone());

        assert_eq!(patients.load().await.unwrap(), 1);

        let draft = patients.open_create();
        draft.first_name = "Jane".into();
        draft.last_name = "Doe".into();
        let outcome = patients.submit().await.unwrap();

        assert!(matches!(
            outcome,
            OperationOutcome::Success(Some(ref p)) if p.first_name == "Jane"
        ));
        assert_eq!(patients.collection().len(), 2);
        assert!(!patients.dialog().is_open());
        assert_eq!(log.last().unwrap().message, "Patient created successfully");
    }

    #[tokio::test]
    async fn server_message_stays_in_the_dialog() {
        let backend = MockBackend::spawn().await;
        let log = Arc::new(NotificationLog::new());
        let mut patients =
            CollectionController::<Patients, _>::new(Arc::new(backend.client()), log.clone());
        patients.load().await.unwrap();

        let draft = patients.open_create();
        draft.first_name = "Janet".into();
        draft.last_name = "Doe".into();
        draft.email = "taken@example.com".into();
        let outcome = patients.submit().await.unwrap();

        assert!(matches!(outcome, OperationOutcome::ValidationFailed(_)));
        assert_eq!(patients.dialog().inline_error(), Some("Email already registered"));
        assert_eq!(patients.collection().len(), 1);
        assert_eq!(log.last().unwrap().severity, Severity::Error);
    }

    #[tokio::test]
    async fn update_and_failed_delete() {
        let backend = MockBackend::spawn().await;
        let log = Arc::new(NotificationLog::new());
        let mut patients =
            CollectionController::<Patients, _>::new(Arc::new(backend.client()), log.clone());
        patients.load().await.unwrap();

        let id = RecordId::from(1);
        patients.open_edit(&id).unwrap().phone = "555-0100".into();
        assert!(patients.submit().await.unwrap().is_success());
        assert_eq!(
            patients.collection().get(&id).unwrap().phone.as_deref(),
            Some("555-0100")
        );

        let outcome = patients.delete(&RecordId::from(999), &|_: &str| true).await;
        assert!(matches!(outcome, DeleteOutcome::Failed(ref e) if e.status == Some(500)));
        assert_eq!(log.last().unwrap().message, "Error deleting patient");

        let outcome = patients.delete(&id, &|_: &str| true).await;
        assert!(matches!(outcome, DeleteOutcome::Deleted));
        assert!(patients.collection().is_empty());
    }

    #[tokio::test]
    async fn bare_array_lists_carry_the_stored_token() {
        let backend = MockBackend::spawn().await;
        let client = Arc::new(backend.client_with_token("tok-1"));
        let log = Arc::new(NotificationLog::new());
        let mut products = CollectionController::<Products, _>::new(client, log);

        assert_eq!(products.load().await.unwrap(), 1);
        assert_eq!(
            backend.auth_headers().last().cloned().flatten().as_deref(),
            Some("Bearer tok-1")
        );
    }

    #[tokio::test]
    async fn token_changes_apply_to_the_next_request() {
        let backend = MockBackend::spawn().await;
        let store = Arc::new(MemoryCredentialStore::with_token("tok-a"));
        let client = Arc::new(backend.client_with_store(store.clone()));
        let mut products =
            CollectionController::<Products, _>::new(client, Arc::new(NotificationLog::new()));

        products.load().await.unwrap();
        store.store("tok-b").unwrap();
        products.load().await.unwrap();
        store.clear().unwrap();
        products.load().await.unwrap();

        assert_eq!(
            backend.auth_headers(),
            vec![
                Some("Bearer tok-a".to_string()),
                Some("Bearer tok-b".to_string()),
                None
            ]
        );
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_failure() {
        let client = Arc::new(mock::unreachable_client());
        let log = Arc::new(NotificationLog::new());
        let mut appointments = CollectionController::<Appointments, _>::new(client, log.clone());

        let err = appointments.load().await.unwrap_err();
        assert_eq!(err.status, None);
        assert_eq!(log.last().unwrap().message, "Error loading appointments");
    }
}
