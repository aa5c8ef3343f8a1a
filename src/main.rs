mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let backend = services::backend::HttpBackend::from_env().expect("BASE_URL required");

    // Login is disabled without Azure config; data proxying still works.
    let azure = services::backend::AzureConfig::from_env();
    if azure.is_none() {
        tracing::warn!("Azure OAuth not configured — login disabled");
    }

    let store_path = services::session::store_path();
    tracing::info!(path = %store_path.display(), "session store opened");
    let sessions = services::session::SessionStore::open(store_path);

    let state = state::AppState::new(sessions, Arc::new(backend), azure);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "found-admin listening");
    axum::serve(listener, app).await.expect("server failed");
}
