//! API proxy routes — verbatim JSON forwarding to the backend.
//!
//! Each handler forwards to a fixed backend path and relays the JSON
//! response unchanged. Transport errors and non-2xx statuses alike
//! collapse to a generic 500 payload; callers cannot tell "unreachable"
//! from "backend rejected" and are not meant to. No auth check happens
//! here — guarding is entirely upstream.

use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::Json;
use serde_json::{json, Value};

use crate::state::AppState;

type ProxyResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

async fn forward(state: &AppState, method: Method, path: &str, body: Option<Value>, context: &str) -> ProxyResult {
    match state.backend.forward(method, path, body).await {
        Ok(data) => Ok(Json(data)),
        Err(e) => {
            tracing::error!(error = %e, path, "proxy request failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": context }))))
        }
    }
}

/// `GET /api/dashboard` — analytics snapshot.
pub async fn dashboard(State(state): State<AppState>) -> ProxyResult {
    forward(&state, Method::GET, "/dashboard", None, "Failed to fetch dashboard").await
}

/// `POST /api/message` — chat message. The backend takes this as a PUT.
pub async fn message(State(state): State<AppState>, Json(body): Json<Value>) -> ProxyResult {
    forward(&state, Method::PUT, "/message", Some(body), "Failed to send message").await
}

/// `POST /api/workers/add` — add an employee.
pub async fn workers_add(State(state): State<AppState>, Json(body): Json<Value>) -> ProxyResult {
    forward(&state, Method::POST, "/users/add", Some(body), "Failed to add worker").await
}

/// `DELETE /api/workers/delete` — remove an employee. Relays a plain
/// success flag rather than the backend body.
pub async fn workers_delete(State(state): State<AppState>, Json(body): Json<Value>) -> ProxyResult {
    forward(&state, Method::DELETE, "/users/delete", Some(body), "Failed to delete worker")
        .await
        .map(|_| Json(json!({ "success": true })))
}

/// `GET /api/feedback` — happiness survey feedback list.
pub async fn feedback(State(state): State<AppState>) -> ProxyResult {
    forward(&state, Method::GET, "/feedback/list", None, "Failed to fetch feedback").await
}

/// `GET /api/file` — uploaded file list.
pub async fn files(State(state): State<AppState>) -> ProxyResult {
    forward(&state, Method::GET, "/file", None, "Failed to fetch files").await
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;
