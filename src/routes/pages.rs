//! Page shells — server-rendered HTML for the dashboard views.
//!
//! Templates are static HTML with `{{KEY}}` placeholders; data tables are
//! filled in by the pages themselves through the `/api` proxy endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::routes::auth::AuthUser;
use crate::state::AppState;

const LOGIN_TEMPLATE: &str = include_str!("../../templates/login.html");
const CALLBACK_TEMPLATE: &str = include_str!("../../templates/callback.html");
const DASHBOARD_TEMPLATE: &str = include_str!("../../templates/dashboard.html");
const WORKERS_TEMPLATE: &str = include_str!("../../templates/workers.html");
const TASKS_TEMPLATE: &str = include_str!("../../templates/tasks.html");
const FILES_TEMPLATE: &str = include_str!("../../templates/files.html");
const CHAT_TEMPLATE: &str = include_str!("../../templates/chat.html");
const FEEDBACK_TEMPLATE: &str = include_str!("../../templates/feedback.html");

/// Substitute `{{KEY}}` placeholders.
pub(crate) fn render(template: &str, pairs: &[(&str, &str)]) -> String {
    let mut out = template.to_owned();
    for (key, value) in pairs {
        out = out.replace(&format!("{{{{{key}}}}}"), value);
    }
    out
}

fn shell(template: &str, auth: &AuthUser) -> Html<String> {
    Html(render(template, &[("USER", auth.user.display_name())]))
}

/// Callback status page, shared by the no-code and exchange-failure states.
pub(crate) fn callback_page(status: &str) -> Html<String> {
    Html(render(CALLBACK_TEMPLATE, &[("STATUS", status)]))
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /login` — Microsoft sign-in page.
pub async fn login(State(state): State<AppState>) -> Response {
    let Some(azure) = &state.azure else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Microsoft OAuth not configured").into_response();
    };

    Html(render(LOGIN_TEMPLATE, &[("AUTHORIZE_URL", azure.authorize_url().as_str())])).into_response()
}

/// `GET /` — analytics dashboard.
pub async fn dashboard(auth: AuthUser) -> Html<String> {
    shell(DASHBOARD_TEMPLATE, &auth)
}

/// `GET /workers` — employee roster.
pub async fn workers(auth: AuthUser) -> Html<String> {
    shell(WORKERS_TEMPLATE, &auth)
}

/// `GET /tasks` — task management.
pub async fn tasks(auth: AuthUser) -> Html<String> {
    shell(TASKS_TEMPLATE, &auth)
}

/// `GET /files` — file manager.
pub async fn files(auth: AuthUser) -> Html<String> {
    shell(FILES_TEMPLATE, &auth)
}

/// `GET /chat` — AI assistant.
pub async fn chat(auth: AuthUser) -> Html<String> {
    shell(CHAT_TEMPLATE, &auth)
}

/// `GET /feedback` — happiness survey feedback.
pub async fn feedback(auth: AuthUser) -> Html<String> {
    shell(FEEDBACK_TEMPLATE, &auth)
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
