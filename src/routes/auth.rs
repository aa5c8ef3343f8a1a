//! Auth routes — Microsoft OAuth callback, session lifecycle, profile.

use axum::extract::{FromRef, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use crate::routes::{guard, pages};
use crate::services::backend::TokenExchangeRequest;
use crate::services::session::{self, UserInfo, COOKIE_NAME};
use crate::state::AppState;

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user resolved against the durable store.
/// Use as a handler parameter to require authentication.
///
/// This is the second, page-level guard: the edge guard has only seen the
/// cookie, so a stale cookie with no stored session still lands here. The
/// rejection redirects to login *and* expires the cookie, keeping both
/// session copies in agreement on the next request.
pub struct AuthUser {
    pub token: String,
    pub user: UserInfo,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();

        if !token.is_empty() {
            let app_state = AppState::from_ref(state);
            if let Some(user) = app_state.sessions.get(token).await {
                return Ok(Self { token: token.to_owned(), user });
            }
        }

        let jar = CookieJar::new().add(session::removal_cookie());
        Err((jar, Redirect::temporary(guard::LOGIN_PATH)).into_response())
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
}

/// `GET /auth/callback` — complete the authorization-code flow.
///
/// Exchanges the code with the backend, installs the session (store +
/// cookie in one operation), and redirects to the landing page. Exchange
/// failures leave the user on the callback page with nothing installed;
/// recovery is a fresh login.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackQuery>,
) -> Response {
    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return pages::callback_page("No code provided").into_response();
    };

    // A replayed callback with a live session must not exchange twice.
    let existing = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
    if !existing.is_empty() && state.sessions.get(existing).await.is_some() {
        return Redirect::temporary(guard::LANDING_PATH).into_response();
    }

    let pending = state.sessions.pending().await;
    let request = TokenExchangeRequest::for_callback(&code, pending.as_ref());

    let exchange = match state.backend.exchange_code(&request).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "token exchange failed");
            return pages::callback_page("Signing in did not complete. Return to the login page and try again.")
                .into_response();
        }
    };

    let Some(token) = exchange.session_token else {
        tracing::error!("token exchange response carried no session token");
        return pages::callback_page("Signing in did not complete. Return to the login page and try again.")
            .into_response();
    };

    // The stash served its purpose; drop it only once the exchange succeeds
    // so a failed attempt can still be retried.
    if pending.is_some() {
        state.sessions.take_pending().await;
    }

    let user = exchange.user.unwrap_or_default();
    let jar = state.sessions.install(jar, &token, user).await;
    (jar, Redirect::temporary(guard::LANDING_PATH)).into_response()
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    email: String,
    code: String,
}

/// `POST /auth/register` — stash a partial registration record for the
/// upcoming OAuth callback.
pub async fn register(State(state): State<AppState>, Json(req): Json<RegisterRequest>) -> StatusCode {
    let email = req.email.trim().to_ascii_lowercase();
    if email.is_empty() || !email.contains('@') {
        return StatusCode::UNPROCESSABLE_ENTITY;
    }

    state.sessions.stash_pending(email, req.code).await;
    StatusCode::NO_CONTENT
}

/// `POST /logout` — clear the session, expire the cookie, back to login.
/// Lives on a protected path: under `/auth` the edge guard would bounce the
/// authenticated request to the landing page before it got here.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let jar = state.sessions.clear(CookieJar::new(), &auth.token).await;
    (jar, Redirect::to(guard::LOGIN_PATH))
}

/// `GET /api/auth/me` — return the current user's profile.
pub async fn me(auth: AuthUser) -> Json<UserInfo> {
    Json(auth.user)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
