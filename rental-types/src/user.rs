//! Users: hosts, review authors, the signed-in session and login credentials.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Public profile of a host or review author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    /// Display name.
    pub name: String,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Pro badge.
    #[serde(default)]
    pub is_pro: bool,
}

/// Signed-in user as returned by `login` (GET and POST).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    /// Display name.
    pub name: String,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Pro badge.
    #[serde(default)]
    pub is_pro: bool,
    /// Account email.
    pub email: String,
    /// Session token to attach to authenticated requests.
    pub token: String,
}

impl fmt::Debug for UserSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserSession")
            .field("name", &self.name)
            .field("avatar_url", &self.avatar_url)
            .field("is_pro", &self.is_pro)
            .field("email", &self.email)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Login credentials.
///
/// Serialized as `{"email": .., "password": ..}`, the body the API expects.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthData {
    /// Account email.
    #[serde(rename = "email")]
    pub login: String,
    /// Plain password; only ever sent over the transport.
    pub password: String,
}

impl AuthData {
    /// Build credentials from an email and password.
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for AuthData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthData")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
