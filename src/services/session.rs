//! Session store — durable token/profile mirror plus the session cookie.
//!
//! ARCHITECTURE
//! ============
//! The session lives in two places: a durable JSON file read by page
//! handlers, and a `sessionToken` cookie read by the edge guard. Both are
//! written by `install`/`clear` only, so one call site produces both side
//! effects and the two copies cannot drift apart mid-operation.
//!
//! TRADE-OFFS
//! ==========
//! File writes are best-effort: a failed flush is logged and the request
//! proceeds on in-memory state. Losing the mirror on restart costs a
//! re-login, silently failing a login costs trust.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;
use tokio::sync::RwLock;
use tracing::{error, warn};

pub const COOKIE_NAME: &str = "sessionToken";

const DEFAULT_STORE_FILE: &str = "found-sessions.json";

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

pub(crate) fn cookie_secure() -> bool {
    if let Some(value) = env_bool("COOKIE_SECURE") {
        return value;
    }

    std::env::var("AZURE_REDIRECT_URI")
        .map(|uri| uri.starts_with("https://"))
        .unwrap_or(false)
}

/// Resolve the durable store path from `SESSION_FILE`.
#[must_use]
pub fn store_path() -> PathBuf {
    std::env::var("SESSION_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_FILE))
}

// =============================================================================
// PROFILE
// =============================================================================

/// Loosely-typed user profile returned by the backend. Fields beyond the
/// named ones pass through untouched via the flattened map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserInfo {
    /// Name shown in page greetings: `first_name`, then `name`, then a stub.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("user")
    }
}

/// Partial registration record stashed by a pre-login step and picked up
/// by the OAuth callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSignup {
    pub email: String,
    pub code: String,
}

// =============================================================================
// STORE
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    sessions: HashMap<String, UserInfo>,
    #[serde(default)]
    pending: Option<PendingSignup>,
}

/// Durable session mirror. Cloning shares the underlying store.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<StoreData>>,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Open the store backed by `path`. A missing file starts empty; an
    /// unreadable one is logged and replaced on the next write.
    #[must_use]
    pub fn open(path: PathBuf) -> Self {
        let data = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "session file unreadable; starting empty");
                StoreData::default()
            }),
            Err(_) => StoreData::default(),
        };
        Self { inner: Arc::new(RwLock::new(data)), path: Some(path) }
    }

    /// Store without a durable file. Used in tests.
    #[must_use]
    pub fn in_memory() -> Self {
        Self { inner: Arc::new(RwLock::new(StoreData::default())), path: None }
    }

    /// Look up the profile for a token. Absent tokens are `None`, never an error.
    pub async fn get(&self, token: &str) -> Option<UserInfo> {
        self.inner.read().await.sessions.get(token).cloned()
    }

    /// Install a session: write the durable entry and add the session cookie
    /// to `jar` in the same operation.
    pub async fn install(&self, jar: CookieJar, token: &str, user: UserInfo) -> CookieJar {
        {
            let mut data = self.inner.write().await;
            data.sessions.insert(token.to_owned(), user);
            self.persist(&data).await;
        }
        jar.add(session_cookie(token))
    }

    /// Remove a session and expire the cookie. Clearing an absent token is a
    /// no-op, so logout is idempotent.
    pub async fn clear(&self, jar: CookieJar, token: &str) -> CookieJar {
        {
            let mut data = self.inner.write().await;
            data.sessions.remove(token);
            self.persist(&data).await;
        }
        jar.add(removal_cookie())
    }

    /// Stash a partial registration record for the upcoming OAuth callback.
    pub async fn stash_pending(&self, email: String, code: String) {
        let mut data = self.inner.write().await;
        data.pending = Some(PendingSignup { email, code });
        self.persist(&data).await;
    }

    /// Read the stashed registration record without consuming it.
    pub async fn pending(&self) -> Option<PendingSignup> {
        self.inner.read().await.pending.clone()
    }

    /// Consume the stashed registration record.
    pub async fn take_pending(&self) -> Option<PendingSignup> {
        let mut data = self.inner.write().await;
        let taken = data.pending.take();
        if taken.is_some() {
            self.persist(&data).await;
        }
        taken
    }

    /// Flush to the durable file via temp-file-plus-rename. Failures are
    /// logged; in-memory state stays authoritative for the running process.
    async fn persist(&self, data: &StoreData) {
        let Some(path) = &self.path else {
            return;
        };

        let json = match serde_json::to_vec_pretty(data) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "session store serialization failed");
                return;
            }
        };

        let tmp = path.with_extension("json.tmp");
        let result = async {
            tokio::fs::write(&tmp, &json).await?;
            tokio::fs::rename(&tmp, path).await
        }
        .await;

        if let Err(e) = result {
            error!(path = %path.display(), error = %e, "session store flush failed");
        }
    }
}

// =============================================================================
// COOKIES
// =============================================================================

/// Session cookie mirroring the bearer token for the edge guard.
#[must_use]
pub fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token.to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cookie_secure())
        .build()
}

/// Expired cookie that removes the session token from the browser.
#[must_use]
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cookie_secure())
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
