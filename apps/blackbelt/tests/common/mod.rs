//! Fake academy API served by axum on a random local port.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// E-mail the fake refuses as already registered.
pub const TAKEN_EMAIL: &str = "taken@b.com";

/// Requests received by the fake, as `(method path, body)`.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<(String, Value)>>>,
    register_delay: Option<Duration>,
}

impl Recorder {
    fn push(&self, call: &str, body: Value) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((call.to_string(), body));
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn bodies(&self, call: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|(c, _)| c == call)
            .map(|(_, b)| b)
            .collect()
    }
}

fn athletes() -> Value {
    json!([
        {
            "id": 7, "first_name": "Ana", "last_name": "Souza", "email": "ana@academy.com",
            "cpf": "123.456.789-00", "phone": "(11) 91234-5678",
            "birthdate": "1995-03-02T00:00:00.000Z", "belt": "Amarela", "level": 2,
            "time": "Blackbelt", "gender": "Feminino", "weight": "Leve - 60kg"
        },
        {
            "id": 8, "first_name": "Bruno", "last_name": "Lima", "email": "bruno@academy.com",
            "birthdate": "2001-11-20", "belt": "Amarela", "time": "Blackbelt"
        },
        { "id": 9, "first_name": "Caio", "last_name": "Reis", "belt": null }
    ])
}

async fn list_athletes() -> Json<Value> {
    Json(athletes())
}

async fn show_athlete(Path(id): Path<u64>) -> Response {
    let found = athletes()
        .as_array()
        .and_then(|all| all.iter().find(|a| a["id"] == id).cloned());
    match found {
        Some(athlete) => Json(athlete).into_response(),
        None => (StatusCode::NOT_FOUND, "Athlete not found").into_response(),
    }
}

async fn update_athlete(
    State(rec): State<Recorder>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> StatusCode {
    rec.push(&format!("PUT /athlete/{id}"), body);
    StatusCode::NO_CONTENT
}

async fn delete_athlete(State(rec): State<Recorder>, Path(id): Path<u64>) -> Response {
    if id == 7 {
        rec.push("DELETE /athlete/7", Value::Null);
        return StatusCode::NO_CONTENT.into_response();
    }
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "message": "Athlete is entered in a championship" })),
    )
        .into_response()
}

async fn register(State(rec): State<Recorder>, Json(body): Json<Value>) -> Response {
    if let Some(delay) = rec.register_delay {
        tokio::time::sleep(delay).await;
    }
    if body["email"] == TAKEN_EMAIL {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "E-mail already registered" })),
        )
            .into_response();
    }
    rec.push("POST /register", body);
    StatusCode::CREATED.into_response()
}

async fn championships() -> Json<Value> {
    Json(json!([
        { "id": 1, "master_id": 2, "date": "2024-08-17T09:00:00.000Z",
          "athlete_id": [7, 8], "description": "Copa Inverno" }
    ]))
}

async fn students() -> Json<Value> {
    Json(json!([
        { "id": 3, "first_name": "Davi", "last_name": "Alves" },
        { "id": 4, "first_name": "Elis", "last_name": "Prado" }
    ]))
}

async fn create_class(State(rec): State<Recorder>, Json(body): Json<Value>) -> StatusCode {
    rec.push("POST /classes", body);
    StatusCode::CREATED
}

/// Start the fake and return its base URL with the request recorder.
pub async fn spawn_academy() -> (String, Recorder) {
    spawn_with(Recorder::default()).await
}

/// Start a fake whose `POST /register` answers only after `delay`.
pub async fn spawn_slow_academy(delay: Duration) -> (String, Recorder) {
    spawn_with(Recorder {
        register_delay: Some(delay),
        ..Recorder::default()
    })
    .await
}

async fn spawn_with(recorder: Recorder) -> (String, Recorder) {
    let router = Router::new()
        .route("/athlete", get(list_athletes))
        .route(
            "/athlete/{id}",
            get(show_athlete).put(update_athlete).delete(delete_athlete),
        )
        .route("/register", post(register))
        .route("/championships", get(championships))
        .route("/students", get(students))
        .route("/classes", post(create_class))
        .with_state(recorder.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), recorder)
}

/// Base URL nothing listens on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
