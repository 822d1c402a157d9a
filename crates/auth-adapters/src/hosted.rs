//! # auth-hosted
//!
//! Email/password sign-in against a hosted auth service
//! (`/auth/v1/token?grant_type=password`, `/auth/v1/logout`).

use anyhow::Context;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use domains::{AuthProvider, DomainError, Session};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

pub struct HostedAuthProvider {
    http: Client,
    base_url: String,
    anon_key: SecretString,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    user: TokenUser,
}

#[derive(Deserialize)]
struct TokenUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// The service reports rejections under different keys depending on the endpoint.
#[derive(Deserialize, Default)]
#[serde(default)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description.or(self.msg).or(self.message)
    }
}

impl HostedAuthProvider {
    pub fn new(url: &str, anon_key: SecretString) -> Self {
        Self {
            http: Client::new(),
            base_url: url.trim().trim_end_matches('/').to_string(),
            anon_key,
        }
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl AuthProvider for HostedAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let response = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", self.anon_key.expose_secret())
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .context("sign-in request")?;

        let status = response.status();
        if status.is_client_error() {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            let message = body
                .into_message()
                .unwrap_or_else(|| "Invalid login credentials".to_string());
            warn!(%email, %status, "sign-in rejected");
            return Err(DomainError::Unauthorized(message));
        }
        if !status.is_success() {
            return Err(anyhow::anyhow!("sign-in failed with {status}").into());
        }

        let token: TokenResponse = response.json().await.context("sign-in response")?;
        let mut session = Session::new(
            token.user.id,
            token.user.email.unwrap_or_else(|| email.to_string()),
            SecretString::from(token.access_token),
        );
        if let Some(secs) = token.expires_in {
            session = session.with_expiry(Utc::now() + Duration::seconds(secs));
        }
        info!(email = %session.email, "signed in to hosted auth");
        Ok(session)
    }

    async fn sign_out(&self, session: &Session) -> anyhow::Result<()> {
        let response = self
            .http
            .post(self.auth_url("logout"))
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(session.access_token())
            .send()
            .await
            .context("sign-out request")?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("sign-out failed with {status}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints() {
        let auth = HostedAuthProvider::new("https://proj.example.co/", SecretString::from("anon"));
        assert_eq!(auth.auth_url("token"), "https://proj.example.co/auth/v1/token");
        assert_eq!(auth.auth_url("logout"), "https://proj.example.co/auth/v1/logout");
    }

    #[test]
    fn rejection_message_prefers_description() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        )
        .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Invalid login credentials"));

        let body: ErrorBody = serde_json::from_str(r#"{"msg":"Email not confirmed"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Email not confirmed"));
    }
}
