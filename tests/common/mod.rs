//! In-process stand-in for the Notify backend.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use notify_client::{ClientConfig, NotifyApi, SessionStore};
use serde_json::{json, Value};
use tempfile::TempDir;

pub const ADMIN_TOKEN: &str = "admin-token";
pub const USER_TOKEN: &str = "user-token";
pub const PASSWORD: &str = "password123";
pub const COVER_BYTES: &[u8] = b"\x89PNG fake cover image bytes";

/// One multipart field the stub received.
#[derive(Debug, Clone)]
pub struct ReceivedField {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Clone, Default)]
pub struct Stub {
    pub registrations: Arc<Mutex<Vec<Vec<ReceivedField>>>>,
    pub requested_paths: Arc<Mutex<Vec<String>>>,
}

impl Stub {
    pub fn last_registration(&self) -> Vec<ReceivedField> {
        self.registrations
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_default()
    }

    pub fn field(&self, name: &str) -> Option<ReceivedField> {
        self.last_registration().into_iter().find(|f| f.name == name)
    }
}

/// A running stub plus a client and an empty session pointed at it.
pub struct TestBackend {
    pub stub: Stub,
    pub root: String,
    pub api: NotifyApi,
    pub session: SessionStore,
    pub dir: TempDir,
}

pub async fn start() -> TestBackend {
    let stub = Stub::default();
    let app = Router::new()
        .route("/api/v1/albums/{query}", get(search))
        .route("/api/v1/album/{artist}/{title}", get(album))
        .route("/api/v1/usuarios/register", post(register))
        .route("/api-user-login/", post(login))
        .route("/api/v1/logger/monitoring/dashboard", get(dashboard))
        .route("/api/v1/logger/monitoring/logs", get(logs))
        .route("/covers/{name}", get(cover))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let root = format!("http://{}", addr);
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig::default()
        .with_server(&root)
        .with_session_file(dir.path().join("session.json"));

    TestBackend {
        stub,
        api: NotifyApi::new(&config).unwrap(),
        session: SessionStore::load(&config.session_file).unwrap(),
        root,
        dir,
    }
}

/// A client pointed at a port nothing listens on.
pub fn unreachable_api() -> NotifyApi {
    let config = ClientConfig::default().with_server("http://127.0.0.1:1");
    NotifyApi::new(&config).unwrap()
}

async fn search(State(stub): State<Stub>, Path(query): Path<String>) -> Response {
    stub.requested_paths.lock().unwrap().push(query.clone());
    match query.as_str() {
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "Traceback...").into_response(),
        "nothing" => Json(json!([])).into_response(),
        _ => Json(json!([
            {"titulo": format!("{} Vol. 1", query), "artista": "Stub Artist", "foto": "https://img/1.png"},
            {"titulo": format!("{} Vol. 2", query), "artista": "Stub Artist", "foto": null}
        ]))
        .into_response(),
    }
}

async fn album(State(stub): State<Stub>, Path((artist, title)): Path<(String, String)>) -> Response {
    stub.requested_paths
        .lock()
        .unwrap()
        .push(format!("{}|{}", artist, title));
    if artist == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response();
    }
    Json(json!({
        "titulo": title,
        "artista": artist,
        "fechaLanzamiento": "12 Mar 2001",
        "reproducciones": "51234567",
        "oyentes": 2345678,
        "info": "",
        "cantidadCanciones": 14,
        "foto": "",
        "etiquetas": "electronic",
        "duracion": 3672
    }))
    .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default().to_string();
    if body["password"] != PASSWORD {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"non_field_errors": ["Unable to log in with provided credentials."]})),
        )
            .into_response();
    }
    let admin = username == "admin";
    let token = if admin { ADMIN_TOKEN } else { USER_TOKEN };
    let id = if admin { 1 } else { 2 };
    Json(json!({
        "token": token,
        "id": id,
        "username": username,
        "is_staff": admin,
        "is_superuser": false
    }))
    .into_response()
}

async fn register(State(stub): State<Stub>, mut multipart: Multipart) -> Response {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap().to_vec();
        fields.push(ReceivedField {
            name,
            file_name,
            content_type,
            data,
        });
    }

    let text = |name: &str| {
        fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| String::from_utf8_lossy(&f.data).into_owned())
    };
    let username = text("username").unwrap_or_default();
    let is_staff = text("is_staff").as_deref() == Some("true");
    stub.registrations.lock().unwrap().push(fields.clone());

    if username == "taken" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"username": ["A user with that username already exists."]})),
        )
            .into_response();
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "token": "new-token",
            "id": 42,
            "username": username,
            "is_staff": is_staff,
            "message": "User created"
        })),
    )
        .into_response()
}

fn check_admin(headers: &HeaderMap) -> Result<(), Response> {
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(v) if v == format!("Token {}", ADMIN_TOKEN) => Ok(()),
        Some(v) if v == format!("Token {}", USER_TOKEN) => Err((
            StatusCode::FORBIDDEN,
            Json(json!({"detail": "You do not have permission to perform this action."})),
        )
            .into_response()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid token."})),
        )
            .into_response()),
    }
}

async fn dashboard(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
    if let Err(resp) = check_admin(&headers) {
        return resp;
    }
    let hours: u32 = params
        .get("hours")
        .and_then(|h| h.parse().ok())
        .unwrap_or(24);
    Json(json!({
        "time_range_hours": hours,
        "total_requests": 1200,
        "average_response_time_ms": 87.5,
        "error_count": 12,
        "error_rate_percent": 1.0,
        "error_breakdown": [{"status_code": 500, "count": 12}],
        "status_distribution": [{"status_code": 200, "count": 1188}, {"status_code": 500, "count": 12}],
        "top_endpoints": [],
        "recent_errors": []
    }))
    .into_response()
}

async fn logs(headers: HeaderMap) -> Response {
    if let Err(resp) = check_admin(&headers) {
        return resp;
    }
    Json(json!([
        {"tipo": "ACTION", "cuerpo": "Un usuario anónimo buscó daft", "fechahora": "2024-01-01 10:00"},
        {"tipo": "ERROR", "cuerpo": "lookup failed", "fechahora": "2024-01-01 10:01"}
    ]))
    .into_response()
}

async fn cover(Path(name): Path<String>) -> Response {
    match name.as_str() {
        "discovery.png" => ([("content-type", "image/png")], COVER_BYTES).into_response(),
        "broken.png" => (StatusCode::OK, broken_body()).into_response(),
        "broken-error.png" => (StatusCode::INTERNAL_SERVER_ERROR, broken_body()).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// A body that sends one chunk and then drops the connection.
fn broken_body() -> Body {
    let chunks = futures_util::stream::iter(vec![
        Ok::<_, std::io::Error>(Bytes::from_static(b"partial")),
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
    ]);
    Body::from_stream(chunks)
}
