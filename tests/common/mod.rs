//! In-process fake of the Tailink REST API for workflow tests.

#![allow(dead_code)]

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tailink::{ApiClient, ApiConfig, MemorySessionStore, Tailink};

pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "tok-alice";

/// A multipart upload as the server saw it
#[derive(Debug, Clone)]
pub struct Upload {
    pub fields: HashMap<String, String>,
    /// (field name, file name, size)
    pub file: Option<(String, String, usize)>,
}

pub struct FakeState {
    origin: String,
    pub hits: AtomicUsize,
    pub registrations: Mutex<Vec<Upload>>,
    pub dog_uploads: Mutex<Vec<Upload>>,
    pub availability_posts: Mutex<Vec<Value>>,
    pub auth_headers: Mutex<Vec<Option<String>>>,
    pub place_auth: Mutex<Vec<Option<String>>>,
}

impl FakeState {
    fn hit(&self, headers: &HeaderMap) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.auth_headers.lock().unwrap().push(auth);
    }

    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn media(&self, file: &str) -> String {
        format!("{}/media/{}", self.origin, file)
    }
}

type Shared = Arc<FakeState>;

pub struct FakeApi {
    pub base_url: String,
    pub state: Shared,
}

impl FakeApi {
    /// Start the fake on an ephemeral port
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let origin = format!("http://{}", addr);

        let state = Arc::new(FakeState {
            origin: origin.clone(),
            hits: AtomicUsize::new(0),
            registrations: Mutex::new(Vec::new()),
            dog_uploads: Mutex::new(Vec::new()),
            availability_posts: Mutex::new(Vec::new()),
            auth_headers: Mutex::new(Vec::new()),
            place_auth: Mutex::new(Vec::new()),
        });

        let router = Router::new()
            .route("/api/owner/login/", post(login))
            .route("/api/owner/register/", post(register))
            .route("/api/owner/dogs/my/", get(my_dogs).post(create_dog))
            .route("/api/owner/auth/me/", get(me))
            .route(
                "/api/owner/owner-availability/",
                get(list_availabilities).post(create_availability),
            )
            .route("/api/place/places/", get(places))
            .route("/api/owner/dogs/", get(all_dogs))
            .route("/media/rex.png", get(photo))
            .route("/media/bo.png", get(photo))
            .with_state(Arc::clone(&state));

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("{}/api/", origin),
            state,
        }
    }

    pub fn app(&self) -> Tailink<MemorySessionStore> {
        let client = ApiClient::new(&ApiConfig::new(&self.base_url)).unwrap();
        Tailink::new(client, MemorySessionStore::new())
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Token {}", TOKEN);
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected.as_str())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Authentication credentials were not provided."})),
    )
        .into_response()
}

async fn read_upload(mut multipart: Multipart) -> Upload {
    let mut fields = HashMap::new();
    let mut file = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let bytes = field.bytes().await.unwrap();
                file = Some((name, file_name, bytes.len()));
            }
            None => {
                fields.insert(name, field.text().await.unwrap());
            }
        }
    }

    Upload { fields, file }
}

async fn login(State(s): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    s.hit(&headers);
    if body["username"] == USERNAME && body["password"] == PASSWORD {
        Json(json!({"token": TOKEN})).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"non_field_errors": ["Unable to log in with provided credentials."]})),
        )
            .into_response()
    }
}

async fn register(State(s): State<Shared>, headers: HeaderMap, multipart: Multipart) -> Response {
    s.hit(&headers);
    let upload = read_upload(multipart).await;
    let taken = upload.fields.get("username").map(String::as_str) == Some("taken");
    s.registrations.lock().unwrap().push(upload);

    if taken {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"username": ["A user with that username already exists."]})),
        )
            .into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({"message": "User registered successfully!"})),
    )
        .into_response()
}

async fn my_dogs(State(s): State<Shared>, headers: HeaderMap) -> Response {
    s.hit(&headers);
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!([
        {"name": "Rex", "age": 3, "picture": s.media("rex.png")},
        {"name": "Bo", "age": 5, "picture": s.media("bo.png")}
    ]))
    .into_response()
}

async fn create_dog(State(s): State<Shared>, headers: HeaderMap, multipart: Multipart) -> Response {
    s.hit(&headers);
    if !authorized(&headers) {
        return unauthorized();
    }
    let upload = read_upload(multipart).await;
    let name = upload.fields.get("name").cloned().unwrap_or_default();
    let age = upload.fields.get("age").cloned().unwrap_or_default();
    s.dog_uploads.lock().unwrap().push(upload);

    match age.parse::<u32>() {
        Ok(age) => (
            StatusCode::CREATED,
            Json(json!({"name": name, "age": age, "picture": s.media("new.png")})),
        )
            .into_response(),
        Err(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"age": ["A valid integer is required."]})),
        )
            .into_response(),
    }
}

async fn me(State(s): State<Shared>, headers: HeaderMap) -> Response {
    s.hit(&headers);
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"username": USERNAME, "email": "alice@example.com"})).into_response()
}

async fn create_availability(
    State(s): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    s.hit(&headers);
    if !authorized(&headers) {
        return unauthorized();
    }
    s.availability_posts.lock().unwrap().push(body.clone());

    if body["dog"] == "Unknown" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"dog": "Dog not found for this owner"})),
        )
            .into_response();
    }

    let mut record = body;
    record["place_id"] = json!(1);
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn list_availabilities(State(s): State<Shared>, headers: HeaderMap) -> Response {
    s.hit(&headers);
    Json(json!([
        {
            "owner_username": "alice", "dog": "Rex", "place_name": "Central Park", "place_id": 1,
            "start_time": "2025-05-01T07:00:00Z", "end_time": "2025-05-01T08:00:00Z"
        },
        {
            "owner_username": "alice", "dog": "Bo", "place_name": "Central Park", "place_id": "1",
            "start_time": "2025-05-02T07:00:00Z", "end_time": "2025-05-02T08:00:00Z"
        },
        {
            "owner_username": "bob", "dog": "Rex", "place_name": "Beach", "place_id": 2,
            "start_time": "2025-05-03T07:00:00Z", "end_time": "2025-05-03T08:00:00Z"
        },
        {
            "owner_username": "carol", "dog": "Ghost", "place_name": "Dog Run", "place_id": 3,
            "start_time": "2025-05-04T07:00:00Z", "end_time": "2025-05-04T08:00:00Z"
        }
    ]))
    .into_response()
}

async fn places(State(s): State<Shared>, headers: HeaderMap) -> Response {
    s.hit(&headers);
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    s.place_auth.lock().unwrap().push(auth);
    Json(json!([
        {
            "id": 1, "name": "Central Park", "address": "1 Park Ave",
            "latitude": "32.195000", "longitude": "34.860000"
        },
        {"id": 2, "name": "Beach", "address": "Shore Rd", "latitude": null, "longitude": null},
        {
            "id": 3, "name": "Dog Run", "address": "3 Run St",
            "latitude": "32.100000", "longitude": "34.800000"
        }
    ]))
    .into_response()
}

async fn all_dogs(State(s): State<Shared>, headers: HeaderMap) -> Response {
    s.hit(&headers);
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!([
        {"name": "Rex", "age": 3, "picture": s.media("rex.png")},
        {"name": "Bo", "age": 5, "picture": s.media("bo.png")},
        {"name": "Ghost", "age": 9, "picture": s.media("missing.png")}
    ]))
    .into_response()
}

async fn photo() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/png")], vec![0x89u8, b'P', b'N', b'G'])
}
