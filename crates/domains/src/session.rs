//! Authenticated admin session.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

/// Proof of a successful sign-in. Its presence gates every write path.
#[derive(Debug)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    access_token: SecretString,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>, access_token: SecretString) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            access_token,
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Bearer token for authenticated remote calls.
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}
