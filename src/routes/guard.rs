//! Edge guard — request-time redirects decided from path and cookie alone.
//!
//! DESIGN
//! ======
//! Runs before any handler, on every request except the asset exclusion
//! list. It sees only the `sessionToken` cookie — never the durable store —
//! so the decision function is pure and the whole layer is deterministic:
//! identical path + cookie inputs always produce identical outcomes.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::services::session::COOKIE_NAME;

/// Where unauthenticated requests land.
pub const LOGIN_PATH: &str = "/login";
/// Where authenticated requests land.
pub const LANDING_PATH: &str = "/";

/// Non-page assets the guard never evaluates.
const EXCLUDED_PATHS: &[&str] = &["/favicon.ico", "/healthz"];
const EXCLUDED_PREFIXES: &[&str] = &["/assets/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request through unchanged.
    Pass,
    /// Redirect to the login page.
    ToLogin,
    /// Redirect to the protected landing page.
    ToLanding,
}

/// Paths reachable without a session: the login page and the auth flow.
#[must_use]
pub fn is_public(path: &str) -> bool {
    path == LOGIN_PATH || path.starts_with("/auth")
}

/// Paths the guard skips entirely.
#[must_use]
pub fn is_excluded(path: &str) -> bool {
    EXCLUDED_PATHS.contains(&path) || EXCLUDED_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// The guard's full decision table.
#[must_use]
pub fn decide(path: &str, has_session_cookie: bool) -> GuardDecision {
    if is_excluded(path) {
        return GuardDecision::Pass;
    }

    match (is_public(path), has_session_cookie) {
        // An authenticated user has no business on the login page.
        (true, true) => GuardDecision::ToLanding,
        (false, false) => GuardDecision::ToLogin,
        _ => GuardDecision::Pass,
    }
}

/// Middleware wrapper over [`decide`].
pub async fn edge_guard(request: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let has_cookie = jar
        .get(COOKIE_NAME)
        .map(Cookie::value)
        .is_some_and(|v| !v.is_empty());

    match decide(request.uri().path(), has_cookie) {
        GuardDecision::Pass => next.run(request).await,
        GuardDecision::ToLogin => Redirect::temporary(LOGIN_PATH).into_response(),
        GuardDecision::ToLanding => Redirect::temporary(LANDING_PATH).into_response(),
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
