use super::*;

fn azure() -> AzureConfig {
    AzureConfig {
        client_id: "client-123".into(),
        tenant_id: "tenant-456".into(),
        redirect_uri: "http://localhost:3000/auth/callback".into(),
    }
}

// =============================================================================
// authorize_url
// =============================================================================

#[test]
fn authorize_url_targets_tenant_endpoint() {
    let url = azure().authorize_url();
    assert!(url.starts_with("https://login.microsoftonline.com/tenant-456/oauth2/v2.0/authorize?"));
}

#[test]
fn authorize_url_carries_code_flow_params() {
    let url = azure().authorize_url();
    assert!(url.contains("client_id=client-123"));
    assert!(url.contains("response_type=code"));
    assert!(url.contains("response_mode=query"));
    assert!(url.contains("scope=openid%20profile%20email%20User.Read"));
}

#[test]
fn authorize_url_encodes_redirect_uri() {
    let url = azure().authorize_url();
    assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fcallback"));
    assert!(!url.contains("redirect_uri=http://"));
}

// =============================================================================
// TokenExchangeRequest
// =============================================================================

#[test]
fn for_callback_without_stash_uses_query_code() {
    let request = TokenExchangeRequest::for_callback("ABC123", None);
    assert!(request.is_web);
    assert_eq!(request.code, "ABC123");
    assert!(request.email.is_none());
}

#[test]
fn for_callback_with_stash_replaces_code_and_adds_email() {
    let pending = PendingSignup { email: "a@x.com".into(), code: "SIGNUP-7".into() };
    let request = TokenExchangeRequest::for_callback("ABC123", Some(&pending));
    assert_eq!(request.code, "SIGNUP-7");
    assert_eq!(request.email.as_deref(), Some("a@x.com"));
}

#[test]
fn request_serializes_is_web_camel_case() {
    let request = TokenExchangeRequest::for_callback("ABC123", None);
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["isWeb"], true);
    assert_eq!(json["code"], "ABC123");
    assert!(json.get("email").is_none());
}

#[test]
fn request_serializes_email_when_present() {
    let pending = PendingSignup { email: "a@x.com".into(), code: "SIGNUP-7".into() };
    let request = TokenExchangeRequest::for_callback("ABC123", Some(&pending));
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["email"], "a@x.com");
}

// =============================================================================
// TokenExchangeResponse — the backend spells the token field both ways.
// =============================================================================

#[test]
fn response_parses_snake_case_token() {
    let resp: TokenExchangeResponse =
        serde_json::from_str(r#"{"session_token":"tok1","user":{"first_name":"Ann"}}"#).unwrap();
    assert_eq!(resp.session_token.as_deref(), Some("tok1"));
    assert_eq!(resp.user.unwrap().first_name.as_deref(), Some("Ann"));
}

#[test]
fn response_parses_camel_case_token() {
    let resp: TokenExchangeResponse = serde_json::from_str(r#"{"sessionToken":"tok1"}"#).unwrap();
    assert_eq!(resp.session_token.as_deref(), Some("tok1"));
}

#[test]
fn response_tolerates_empty_object() {
    let resp: TokenExchangeResponse = serde_json::from_str("{}").unwrap();
    assert!(resp.session_token.is_none());
    assert!(resp.user.is_none());
}

#[test]
fn response_user_keeps_extra_fields() {
    let resp: TokenExchangeResponse =
        serde_json::from_str(r#"{"sessionToken":"t","user":{"first_name":"Ann","role":"admin"}}"#).unwrap();
    assert_eq!(resp.user.unwrap().extra["role"], "admin");
}

// =============================================================================
// HttpBackend
// =============================================================================

#[test]
fn url_joins_base_and_path() {
    let backend = HttpBackend::new("http://backend:9000".into());
    assert_eq!(backend.url("/dashboard"), "http://backend:9000/dashboard");
}

#[test]
fn url_trims_trailing_slash() {
    let backend = HttpBackend::new("http://backend:9000/".into());
    assert_eq!(backend.url("/auth/token"), "http://backend:9000/auth/token");
}

// =============================================================================
// BackendError
// =============================================================================

#[test]
fn error_display_includes_context() {
    let err = BackendError::Request("connection refused".into());
    assert_eq!(err.to_string(), "backend request failed: connection refused");

    let err = BackendError::Status { status: 502, body: String::new() };
    assert_eq!(err.to_string(), "backend returned status 502");
}
