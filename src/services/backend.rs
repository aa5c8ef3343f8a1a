//! Backend API client — Microsoft authorize URL, token exchange, and JSON
//! proxy forwarding to the 3M Found backend.

use async_trait::async_trait;
use axum::http::Method;
use serde::{Deserialize, Serialize};

use crate::services::session::{PendingSignup, UserInfo};

/// Microsoft (Azure AD) OAuth configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct AzureConfig {
    pub client_id: String,
    pub tenant_id: String,
    pub redirect_uri: String,
}

impl AzureConfig {
    /// Load from `AZURE_CLIENT_ID`, `AZURE_TENANT_ID`, `AZURE_REDIRECT_URI`.
    /// Returns `None` if any are missing (login will be disabled).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("AZURE_CLIENT_ID").ok()?;
        let tenant_id = std::env::var("AZURE_TENANT_ID").ok()?;
        let redirect_uri = std::env::var("AZURE_REDIRECT_URI").ok()?;
        Some(Self { client_id, tenant_id, redirect_uri })
    }

    /// Build the Microsoft authorization URL for the code flow.
    #[must_use]
    pub fn authorize_url(&self) -> String {
        format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/authorize\
             ?client_id={}\
             &response_type=code\
             &redirect_uri={}\
             &response_mode=query\
             &scope=openid%20profile%20email%20User.Read",
            self.tenant_id,
            self.client_id,
            urlencoding::encode(&self.redirect_uri),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Request(String),
    #[error("backend returned status {status}")]
    Status { status: u16, body: String },
    #[error("backend response parse failed: {0}")]
    Parse(String),
}

// =============================================================================
// TOKEN EXCHANGE
// =============================================================================

/// Body for `POST {base}/auth/token`.
#[derive(Debug, Clone, Serialize)]
pub struct TokenExchangeRequest {
    #[serde(rename = "isWeb")]
    pub is_web: bool,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl TokenExchangeRequest {
    /// Build the exchange body for a callback `code`. A stashed registration
    /// record contributes its email and replaces the query code — the
    /// backend pairs the signup code with the signup email.
    #[must_use]
    pub fn for_callback(code: &str, pending: Option<&PendingSignup>) -> Self {
        match pending {
            Some(p) => Self { is_web: true, code: p.code.clone(), email: Some(p.email.clone()) },
            None => Self { is_web: true, code: code.to_owned(), email: None },
        }
    }
}

/// Response from `POST {base}/auth/token`. The backend has spelled the
/// token field both ways; accept either.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchangeResponse {
    #[serde(default, alias = "sessionToken")]
    pub session_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserInfo>,
}

// =============================================================================
// BACKEND API
// =============================================================================

/// Calls to the external backend. A trait so handler tests substitute a
/// scripted mock.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Exchange an authorization code for a session token and profile.
    async fn exchange_code(&self, request: &TokenExchangeRequest) -> Result<TokenExchangeResponse, BackendError>;

    /// Forward a JSON request to `{base}{path}` and return the response body.
    async fn forward(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, BackendError>;
}

/// Reqwest-backed implementation against `BASE_URL`.
pub struct HttpBackend {
    base_url: String,
    http: reqwest::Client,
}

impl HttpBackend {
    #[must_use]
    pub fn new(base_url: String) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_owned(), http: reqwest::Client::new() }
    }

    /// Load from `BASE_URL`. Returns `None` if unset.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var("BASE_URL").ok().map(Self::new)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn exchange_code(&self, request: &TokenExchangeRequest) -> Result<TokenExchangeResponse, BackendError> {
        let resp = self
            .http
            .post(self.url("/auth/token"))
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        resp.json::<TokenExchangeResponse>()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    async fn forward(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, BackendError> {
        let mut request = self.http.request(method, self.url(path));
        if let Some(body) = &body {
            request = request.json(body);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        resp.json::<serde_json::Value>()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }
}

#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;
