//! Dashboard-facing authentication.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use log::warn;

pub const REALM: &str = "Users";

/// How incoming requests are authenticated, chosen once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthMode {
    Anonymous,
    /// A single HTTP Basic user.
    Basic { username: String, password: String },
}

impl AuthMode {
    /// Basic auth as soon as a user is configured; a missing password means an empty one.
    pub fn from_settings(user: Option<&str>, password: Option<&str>) -> Self {
        match user {
            Some(username) => AuthMode::Basic {
                username: username.to_string(),
                password: password.unwrap_or_default().to_string(),
            },
            None => AuthMode::Anonymous,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AuthMode::Anonymous => "anonymous",
            AuthMode::Basic { .. } => "basic",
        }
    }

    /// Checks an `Authorization` header value against the configured mode.
    pub fn authorize(&self, header: Option<&str>) -> bool {
        let AuthMode::Basic { username, password } = self else {
            return true;
        };
        let Some((user, pass)) = header.and_then(decode_basic) else {
            return false;
        };
        user == *username && pass == *password
    }
}

fn decode_basic(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = BASE64_STANDARD.decode(encoded.trim()).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (user, pass) = text.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

fn challenge() -> Response {
    let mut response = (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    if let Ok(value) = HeaderValue::from_str(&format!("Basic realm=\"{}\"", REALM)) {
        response.headers_mut().insert(WWW_AUTHENTICATE, value);
    }
    response
}

/// Middleware rejecting requests that do not satisfy `mode`.
pub async fn require_auth(State(mode): State<Arc<AuthMode>>, request: Request, next: Next) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if mode.authorize(header) {
        return next.run(request).await;
    }
    warn!("rejected unauthenticated {} {}", request.method(), request.uri().path());
    challenge()
}

#[cfg(test)]
mod tests {
    use super::AuthMode;

    fn basic() -> AuthMode {
        AuthMode::from_settings(Some("grafana"), Some("s3cret"))
    }

    #[test]
    fn anonymous_accepts_everything() {
        let mode = AuthMode::from_settings(None, Some("ignored"));
        assert_eq!(mode, AuthMode::Anonymous);
        assert_eq!(mode.name(), "anonymous");
        assert!(mode.authorize(None));
        assert!(mode.authorize(Some("Basic garbage")));
    }

    #[test]
    fn basic_checks_user_and_password() {
        let mode = basic();
        assert_eq!(mode.name(), "basic");
        // grafana:s3cret
        assert!(mode.authorize(Some("Basic Z3JhZmFuYTpzM2NyZXQ=")));
        assert!(mode.authorize(Some("basic Z3JhZmFuYTpzM2NyZXQ=")));
        // grafana:wrong
        assert!(!mode.authorize(Some("Basic Z3JhZmFuYTp3cm9uZw==")));
        assert!(!mode.authorize(Some("Bearer Z3JhZmFuYTpzM2NyZXQ=")));
        assert!(!mode.authorize(Some("Basic !!!")));
        assert!(!mode.authorize(None));
    }

    #[test]
    fn missing_password_means_empty_password() {
        let mode = AuthMode::from_settings(Some("grafana"), None);
        // grafana:
        assert!(mode.authorize(Some("Basic Z3JhZmFuYTo=")));
    }
}
