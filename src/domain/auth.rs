//! Mock authentication types.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Login form payload for `POST /api/login`.
///
/// The password buffer is wiped on drop and never printed.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: Zeroizing<String>,
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Zeroizing<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.as_str())
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Both fields must be non-blank before anything is sent.
    ///
    /// # Errors
    /// Returns a user-facing message naming the missing field.
    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("Username is required".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response of `GET /api/auth-status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStatus {
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default)]
    pub user: Option<String>,
}

impl AuthStatus {
    #[must_use]
    pub fn logged_in_as(user: impl Into<String>) -> Self {
        Self {
            logged_in: true,
            user: Some(user.into()),
        }
    }
}
