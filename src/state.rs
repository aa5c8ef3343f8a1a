//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the session store (the durable half of the session), the
//! backend client as a trait object so tests can script it, and the
//! optional Azure OAuth configuration.

use std::sync::Arc;

use crate::services::backend::{AzureConfig, BackendApi};
use crate::services::session::SessionStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub backend: Arc<dyn BackendApi>,
    /// `None` if the Azure env vars are not configured; login is disabled.
    pub azure: Option<AzureConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(sessions: SessionStore, backend: Arc<dyn BackendApi>, azure: Option<AzureConfig>) -> Self {
        Self { sessions, backend, azure }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Mutex;

    use axum::http::Method;

    use super::*;
    use crate::services::backend::{BackendError, TokenExchangeRequest, TokenExchangeResponse};

    /// Scripted backend double. Responses are consumed front-to-back; when
    /// the script runs dry, calls fall back to empty-but-successful
    /// responses. Every call is logged for assertions.
    #[derive(Default)]
    pub struct MockBackend {
        pub exchange_script: Mutex<Vec<Result<TokenExchangeResponse, BackendError>>>,
        pub exchange_calls: Mutex<Vec<TokenExchangeRequest>>,
        pub forward_script: Mutex<Vec<Result<serde_json::Value, BackendError>>>,
        pub forward_calls: Mutex<Vec<(Method, String, Option<serde_json::Value>)>>,
    }

    impl MockBackend {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        pub fn script_exchange(&self, response: Result<TokenExchangeResponse, BackendError>) {
            self.exchange_script.lock().unwrap().push(response);
        }

        pub fn script_forward(&self, response: Result<serde_json::Value, BackendError>) {
            self.forward_script.lock().unwrap().push(response);
        }
    }

    #[async_trait::async_trait]
    impl BackendApi for MockBackend {
        async fn exchange_code(
            &self,
            request: &TokenExchangeRequest,
        ) -> Result<TokenExchangeResponse, BackendError> {
            self.exchange_calls.lock().unwrap().push(request.clone());
            let mut script = self.exchange_script.lock().unwrap();
            if script.is_empty() {
                Ok(TokenExchangeResponse { session_token: None, user: None })
            } else {
                script.remove(0)
            }
        }

        async fn forward(
            &self,
            method: Method,
            path: &str,
            body: Option<serde_json::Value>,
        ) -> Result<serde_json::Value, BackendError> {
            self.forward_calls
                .lock()
                .unwrap()
                .push((method, path.to_owned(), body));
            let mut script = self.forward_script.lock().unwrap();
            if script.is_empty() {
                Ok(serde_json::json!({}))
            } else {
                script.remove(0)
            }
        }
    }

    /// App state with an in-memory store, a fresh mock backend, and a dummy
    /// Azure config.
    #[must_use]
    pub fn test_app_state() -> (AppState, Arc<MockBackend>) {
        let backend = Arc::new(MockBackend::new());
        let azure = AzureConfig {
            client_id: "client-123".into(),
            tenant_id: "tenant-456".into(),
            redirect_uri: "http://localhost:3000/auth/callback".into(),
        };
        let state = AppState::new(SessionStore::in_memory(), backend.clone(), Some(azure));
        (state, backend)
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
