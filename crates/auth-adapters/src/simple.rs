//! # auth-simple
//!
//! Argon2-based implementation of `AuthProvider` for a single admin account.
//! Sessions are random bearer tokens with a fixed lifetime; nothing is
//! stored server-side.

use anyhow::anyhow;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use domains::{AuthProvider, DomainError, Session};
use secrecy::SecretString;
use tracing::{info, warn};
use uuid::Uuid;

pub const DEFAULT_SESSION_TTL_HOURS: i64 = 12;

/// Message shown for any rejected sign-in, so callers cannot probe emails.
const INVALID_CREDENTIALS: &str = "Invalid login credentials";

pub struct SimpleAuthProvider {
    admin_email: String,
    /// PHC string, e.g. `$argon2id$v=19$...`
    password_hash: String,
    session_ttl: Duration,
}

impl SimpleAuthProvider {
    /// Accepts the admin email and a stored argon2 hash (e.g., from configuration).
    pub fn new(admin_email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
            password_hash: password_hash.into(),
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Verifies if a provided password matches the stored Argon2 hash.
    fn verify_password(&self, password: &str) -> bool {
        let parsed_hash = match PasswordHash::new(&self.password_hash) {
            Ok(p) => p,
            Err(err) => {
                warn!(error = %err, "stored admin password hash is not a valid PHC string");
                return false;
            }
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

/// Hashes `password` into a PHC string suitable for the `local.admin_password_hash` setting.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes()).map_err(|e| anyhow!("salt: {e}"))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("hash: {e}"))?;
    Ok(hash.to_string())
}

#[async_trait]
impl AuthProvider for SimpleAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        // 1. Account
        if !email.trim().eq_ignore_ascii_case(&self.admin_email) {
            warn!(%email, "sign-in for unknown account");
            return Err(DomainError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        // 2. Password
        if !self.verify_password(password) {
            warn!(%email, "sign-in with wrong password");
            return Err(DomainError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        // 3. Issue session
        let token = SecretString::from(Uuid::new_v4().simple().to_string());
        let session = Session::new("local-admin", self.admin_email.clone(), token)
            .with_expiry(Utc::now() + self.session_ttl);
        info!(email = %self.admin_email, "admin session issued");
        Ok(session)
    }

    async fn sign_out(&self, _session: &Session) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> SimpleAuthProvider {
        SimpleAuthProvider::new("admin@pixel.id", hash_password("rahasia").unwrap())
    }

    #[tokio::test]
    async fn correct_credentials_issue_a_session() {
        let session = provider().sign_in(" Admin@Pixel.id ", "rahasia").await.unwrap();
        assert_eq!(session.email, "admin@pixel.id");
        assert_eq!(session.access_token().len(), 32);
        assert!(!session.is_expired(Utc::now()));
        assert!(session.is_expired(Utc::now() + Duration::hours(13)));
    }

    #[tokio::test]
    async fn wrong_password_or_email_is_unauthorized() {
        let provider = provider();
        for (email, password) in [("admin@pixel.id", "salah"), ("other@pixel.id", "rahasia")] {
            let err = provider.sign_in(email, password).await.unwrap_err();
            assert_eq!(err.to_string(), "unauthorized: Invalid login credentials");
        }
    }

    #[tokio::test]
    async fn malformed_hash_never_verifies() {
        let provider = SimpleAuthProvider::new("admin@pixel.id", "plaintext");
        assert!(provider.sign_in("admin@pixel.id", "plaintext").await.is_err());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("x").unwrap();
        let b = hash_password("x").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
    }
}
