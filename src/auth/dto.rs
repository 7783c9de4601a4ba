use serde::Serialize;
use serde_json::Value;

/// Email/password pair sent to register and login.
#[derive(Debug, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Lenient body parsing: an absent or malformed body, or a field that is
    /// missing or not a string, comes through as an empty string.
    pub fn from_body(body: &[u8]) -> Self {
        let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };
        Self {
            email: field("email"),
            password: field("password"),
        }
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub email: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: PublicUser,
}
