//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the whole gateway: page shells, the auth flow,
//! and the `/api` proxies, with static assets under `/assets`. The edge
//! guard is layered over everything; its exclusion list is the only thing
//! keeping it away from assets and the health probe.

pub mod auth;
pub mod guard;
pub mod pages;
pub mod proxy;

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Resolve the static assets directory.
fn assets_dir() -> PathBuf {
    std::env::var("ASSETS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"))
}

#[must_use]
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::dashboard))
        .route("/workers", get(pages::workers))
        .route("/tasks", get(pages::tasks))
        .route("/files", get(pages::files))
        .route("/chat", get(pages::chat))
        .route("/feedback", get(pages::feedback))
        .route("/login", get(pages::login))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/dashboard", get(proxy::dashboard))
        .route("/api/message", post(proxy::message))
        .route("/api/workers/add", post(proxy::workers_add))
        .route("/api/workers/delete", delete(proxy::workers_delete))
        .route("/api/feedback", get(proxy::feedback))
        .route("/api/file", get(proxy::files))
        .route("/healthz", get(healthz))
        .nest_service("/assets", ServeDir::new(assets_dir()))
        .layer(middleware::from_fn(guard::edge_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
