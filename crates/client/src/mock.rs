//! In-process backend for the client tests, served on an ephemeral local port.

use crate::client::HttpClient;
use axum::extract::{Multipart, Path, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use deskhub_core::session::{CredentialStore, MemoryCredentialStore};
use deskhub_core::ClientConfig;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct MockState {
    patients: Arc<Mutex<Vec<Value>>>,
    auth_headers: Arc<Mutex<Vec<Option<String>>>>,
}

impl MockState {
    fn record_auth(&self, headers: &HeaderMap) {
        let value = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        self.auth_headers.lock().unwrap().push(value);
    }
}

pub(crate) struct MockBackend {
    base_url: String,
    state: MockState,
}

impl MockBackend {
    pub(crate) async fn spawn() -> Self {
        let state = MockState::default();
        state
            .patients
            .lock()
            .unwrap()
            .push(json!({"id": 1, "first_name": "Ana", "last_name": "Reyes"}));

        let router = Router::new()
            .route("/api/dental/patients", get(list_patients).post(create_patient))
            .route("/api/dental/patients/:id", put(update_patient).delete(delete_patient))
            .route("/api/supply/products", get(list_products))
            .route("/api/auth/login", post(login))
            .route("/api/auth/verify", get(verify))
            .route("/api/property/geocode", post(geocode))
            .route("/api/cloud/upload", post(upload))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }

    pub(crate) fn client(&self) -> HttpClient {
        client_for(&self.base_url, Arc::new(MemoryCredentialStore::new()))
    }

    pub(crate) fn client_with_token(&self, token: &str) -> HttpClient {
        client_for(&self.base_url, Arc::new(MemoryCredentialStore::with_token(token)))
    }

    /// A client sharing `store` with the caller, so the test can change the token.
    pub(crate) fn client_with_store(&self, store: Arc<dyn CredentialStore>) -> HttpClient {
        client_for(&self.base_url, store)
    }

    pub(crate) fn auth_headers(&self) -> Vec<Option<String>> {
        self.state.auth_headers.lock().unwrap().clone()
    }
}

/// A client pointed at a port nothing listens on.
pub(crate) fn unreachable_client() -> HttpClient {
    client_for("http://127.0.0.1:9/api", Arc::new(MemoryCredentialStore::new()))
}

fn client_for(base_url: &str, store: Arc<dyn CredentialStore>) -> HttpClient {
    let config = ClientConfig::new(base_url, PathBuf::from("unused-token")).unwrap();
    HttpClient::new(&config, store).unwrap()
}

async fn list_patients(State(state): State<MockState>, headers: HeaderMap) -> Json<Value> {
    state.record_auth(&headers);
    let patients = state.patients.lock().unwrap().clone();
    Json(json!({ "patients": patients }))
}

async fn create_patient(State(state): State<MockState>, Json(mut body): Json<Value>) -> Response {
    if body["email"] == "taken@example.com" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Email already registered"})),
        )
            .into_response();
    }
    let mut patients = state.patients.lock().unwrap();
    let next_id = patients.len() + 1;
    body["id"] = json!(next_id);
    patients.push(body.clone());
    (
        StatusCode::CREATED,
        Json(json!({"message": "Patient created", "patient": body})),
    )
        .into_response()
}

async fn update_patient(
    State(state): State<MockState>,
    Path(id): Path<u64>,
    Json(mut body): Json<Value>,
) -> Response {
    let mut patients = state.patients.lock().unwrap();
    match patients.iter_mut().find(|p| p["id"] == json!(id)) {
        Some(existing) => {
            body["id"] = json!(id);
            *existing = body.clone();
            Json(body).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_patient(State(state): State<MockState>, Path(id): Path<u64>) -> Response {
    if id == 999 {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    state.patients.lock().unwrap().retain(|p| p["id"] != json!(id));
    StatusCode::NO_CONTENT.into_response()
}

async fn list_products(State(state): State<MockState>, headers: HeaderMap) -> Json<Value> {
    state.record_auth(&headers);
    Json(json!([{"id": 1, "name": "Gloves", "sku": "GL-1"}]))
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "crash" {
        return (StatusCode::BAD_GATEWAY, "upstream down").into_response();
    }
    let same_identifier = body["email"] == body["username"];
    if body["password"] == "s3cret" && same_identifier {
        return Json(json!({
            "token": "tok-1",
            "user": {"id": 1, "username": "admin", "email": "admin@example.com", "role": "admin"}
        }))
        .into_response();
    }
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Invalid credentials"})),
    )
        .into_response()
}

async fn verify(headers: HeaderMap) -> Response {
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some("Bearer tok-1") => {
            Json(json!({"user": {"id": 1, "username": "admin"}})).into_response()
        }
        Some("Bearer tok-500") => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid token"}))).into_response(),
    }
}

async fn geocode(Json(query): Json<Value>) -> Response {
    if query["country"] != "USA" {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "country missing"}))).into_response();
    }
    match query["address"].as_str() {
        Some("nowhere") => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Address not found"})),
        )
            .into_response(),
        Some("crash") => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => Json(json!({"latitude": 14.55, "longitude": 121.02})).into_response(),
    }
}

async fn upload(mut multipart: Multipart) -> Response {
    let mut total = 0;
    let mut success = 0;
    let mut errors = Vec::new();
    let mut owner = None;

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().map(str::to_owned);
        let data = field.bytes().await.unwrap();
        match name.as_str() {
            "files" => {
                total += 1;
                let file_name = file_name.unwrap_or_default();
                if file_name.ends_with(".exe") {
                    errors.push(format!("{file_name}: type not allowed"));
                } else {
                    success += 1;
                }
            }
            "owner_id" => owner = Some(String::from_utf8_lossy(&data).into_owned()),
            _ => {}
        }
    }

    if owner.is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "owner_id is required"})),
        )
            .into_response();
    }
    Json(json!({"success_count": success, "total_count": total, "errors": errors})).into_response()
}
