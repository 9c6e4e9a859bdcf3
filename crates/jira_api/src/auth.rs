//! Credentials used to sign every Jira request.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Username plus password or API token, sent as HTTP Basic.
    Basic { username: String, password: String },
    /// Personal access token, sent as a bearer token.
    Bearer(String),
}

impl Credentials {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Credentials::Bearer(token.into())
    }

    /// Renders the `Authorization` header value.
    pub fn header_value(&self) -> String {
        match self {
            Credentials::Basic { username, password } => {
                let encoded = BASE64_STANDARD.encode(format!("{}:{}", username, password));
                format!("Basic {}", encoded)
            }
            Credentials::Bearer(token) => format!("Bearer {}", token),
        }
    }
}

// Secrets stay out of debug output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::Bearer(_) => f.debug_tuple("Bearer").field(&"<redacted>").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Credentials;

    #[test]
    fn basic_header_is_base64_of_user_and_password() {
        let credentials = Credentials::basic("Aladdin", "open sesame");
        assert_eq!(credentials.header_value(), "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
    }

    #[test]
    fn bearer_header_carries_token_verbatim() {
        assert_eq!(Credentials::bearer("abc").header_value(), "Bearer abc");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let rendered = format!("{:?}", Credentials::basic("bot", "hunter2"));
        assert!(rendered.contains("bot"));
        assert!(!rendered.contains("hunter2"));
        assert!(!format!("{:?}", Credentials::bearer("tok-123")).contains("tok-123"));
    }
}
