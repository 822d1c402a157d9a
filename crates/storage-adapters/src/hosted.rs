//! # Hosted backend
//!
//! PostgREST-style tables and object storage over HTTPS. Every request
//! carries the project `apikey`; writes authenticate with the admin's
//! access token, public reads and the contact insert with the anon key.

use anyhow::{bail, Context};
use async_trait::async_trait;
use bytes::Bytes;
use domains::{
    BlogPost, BlogPostRecord, BlogRepo, ContactMessage, ContentRepo, MediaStorage, MessageId,
    MessageInsert, MessageRepo, Session,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const UPSERT_PREFERENCE: &str = "resolution=merge-duplicates";

#[derive(Debug)]
pub struct HostedConfig {
    /// Project base URL, e.g. `https://xyz.example.co`
    pub url: String,
    pub anon_key: SecretString,
    pub bucket: String,
    pub document_table: String,
    pub blog_table: String,
    pub messages_table: String,
}

impl HostedConfig {
    pub fn new(url: impl Into<String>, anon_key: SecretString) -> Self {
        Self {
            url: url.into(),
            anon_key,
            bucket: "site-assets".into(),
            document_table: "site_content".into(),
            blog_table: "blog_posts".into(),
            messages_table: "contact_messages".into(),
        }
    }
}

pub struct HostedClient {
    http: Client,
    base_url: String,
    config: HostedConfig,
}

#[derive(Deserialize)]
struct DocumentRow {
    content: serde_json::Value,
}

impl HostedClient {
    /// Fails when the URL or key is missing; callers treat that as "not configured".
    pub fn new(config: HostedConfig) -> anyhow::Result<Self> {
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() || config.anon_key.expose_secret().trim().is_empty() {
            bail!("hosted backend needs both a URL and an anon key");
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            bail!("hosted backend URL must be http(s): {base_url}");
        }
        Ok(Self {
            http: Client::new(),
            base_url,
            config,
        })
    }

    pub fn config(&self) -> &HostedConfig {
        &self.config
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.config.bucket, path)
    }

    fn request(&self, method: Method, url: String, session: Option<&Session>) -> RequestBuilder {
        let token = match session {
            Some(s) => s.access_token(),
            None => self.config.anon_key.expose_secret(),
        };
        self.http
            .request(method, url)
            .header("apikey", self.config.anon_key.expose_secret())
            .bearer_auth(token)
    }
}

/// Turns non-2xx responses into errors carrying the body text.
async fn ensure_success(response: Response, what: &str) -> anyhow::Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    bail!("{what} failed with {status}: {body}")
}

fn id_filter(id: &MessageId) -> String {
    format!("eq.{}", id.normalized())
}

#[async_trait]
impl ContentRepo for HostedClient {
    async fn fetch_document(&self, id: i64) -> anyhow::Result<Option<serde_json::Value>> {
        let url = self.rest_url(&self.config.document_table);
        let response = self
            .request(Method::GET, url, None)
            .query(&[("select", "content".to_string()), ("id", format!("eq.{id}"))])
            .send()
            .await
            .context("document request")?;
        let rows: Vec<DocumentRow> = ensure_success(response, "document fetch").await?.json().await?;
        Ok(rows.into_iter().next().map(|row| row.content))
    }

    async fn upsert_document(&self, session: &Session, id: i64, content: serde_json::Value) -> anyhow::Result<()> {
        let url = self.rest_url(&self.config.document_table);
        let response = self
            .request(Method::POST, url, Some(session))
            .header("Prefer", UPSERT_PREFERENCE)
            .json(&json!([{ "id": id, "content": content }]))
            .send()
            .await
            .context("document upsert request")?;
        ensure_success(response, "document upsert").await?;
        debug!(id, "document upserted");
        Ok(())
    }
}

#[async_trait]
impl BlogRepo for HostedClient {
    async fn list_posts(&self) -> anyhow::Result<Vec<BlogPost>> {
        let url = self.rest_url(&self.config.blog_table);
        let response = self
            .request(Method::GET, url, None)
            .query(&[("select", "*"), ("order", "date.desc")])
            .send()
            .await
            .context("blog request")?;
        Ok(ensure_success(response, "blog fetch").await?.json().await?)
    }

    async fn upsert_posts(&self, session: &Session, posts: Vec<BlogPostRecord>) -> anyhow::Result<()> {
        let url = self.rest_url(&self.config.blog_table);
        let response = self
            .request(Method::POST, url, Some(session))
            .header("Prefer", UPSERT_PREFERENCE)
            .json(&posts)
            .send()
            .await
            .context("blog upsert request")?;
        ensure_success(response, "blog upsert").await?;
        debug!(count = posts.len(), "blog posts upserted");
        Ok(())
    }
}

#[async_trait]
impl MessageRepo for HostedClient {
    async fn list_messages(&self, session: &Session) -> anyhow::Result<Vec<ContactMessage>> {
        let url = self.rest_url(&self.config.messages_table);
        let response = self
            .request(Method::GET, url, Some(session))
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await
            .context("messages request")?;
        Ok(ensure_success(response, "messages fetch").await?.json().await?)
    }

    async fn insert_message(&self, message: MessageInsert) -> anyhow::Result<()> {
        let url = self.rest_url(&self.config.messages_table);
        let response = self
            .request(Method::POST, url, None)
            .json(&[message])
            .send()
            .await
            .context("message insert request")?;
        ensure_success(response, "message insert").await?;
        Ok(())
    }

    async fn set_read(&self, session: &Session, id: &MessageId, is_read: bool) -> anyhow::Result<()> {
        let url = self.rest_url(&self.config.messages_table);
        let response = self
            .request(Method::PATCH, url, Some(session))
            .query(&[("id", id_filter(id))])
            .json(&json!({ "is_read": is_read }))
            .send()
            .await
            .context("message update request")?;
        ensure_success(response, "message update").await?;
        Ok(())
    }

    async fn delete_message(&self, session: &Session, id: &MessageId) -> anyhow::Result<()> {
        let url = self.rest_url(&self.config.messages_table);
        let response = self
            .request(Method::DELETE, url, Some(session))
            .query(&[("id", id_filter(id))])
            .send()
            .await
            .context("message delete request")?;
        ensure_success(response, "message delete").await?;
        Ok(())
    }
}

#[async_trait]
impl MediaStorage for HostedClient {
    async fn put_object(&self, session: &Session, path: &str, data: Bytes, content_type: &str) -> anyhow::Result<()> {
        let size = data.len();
        let response = self
            .request(Method::POST, self.object_url(path), Some(session))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await
            .context("object upload request")?;
        ensure_success(response, "object upload").await?;
        debug!(path, size, "object uploaded");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.config.bucket, path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HostedClient {
        HostedClient::new(HostedConfig::new("https://proj.example.co/", SecretString::from("anon"))).unwrap()
    }

    #[test]
    fn missing_url_or_key_is_rejected() {
        assert!(HostedClient::new(HostedConfig::new("", SecretString::from("anon"))).is_err());
        assert!(HostedClient::new(HostedConfig::new("https://p.example.co", SecretString::from(" "))).is_err());
        assert!(HostedClient::new(HostedConfig::new("proj.example.co", SecretString::from("anon"))).is_err());
    }

    #[test]
    fn urls_follow_rest_and_storage_layout() {
        let c = client();
        assert_eq!(c.rest_url("site_content"), "https://proj.example.co/rest/v1/site_content");
        assert_eq!(
            c.object_url("uploads/1-a.jpg"),
            "https://proj.example.co/storage/v1/object/site-assets/uploads/1-a.jpg"
        );
        assert_eq!(
            c.public_url("uploads/1-a.jpg"),
            "https://proj.example.co/storage/v1/object/public/site-assets/uploads/1-a.jpg"
        );
    }

    #[test]
    fn message_ids_filter_as_integers() {
        assert_eq!(id_filter(&MessageId::Text("12".into())), "eq.12");
        assert_eq!(id_filter(&MessageId::Text("abc".into())), "eq.abc");
    }
}
