//! # Ports
//!
//! Any adapter must implement these traits to be plugged into the content
//! store. Calls that change remote state take the admin [`Session`]; public
//! reads and the contact-form insert do not.

use crate::errors::DomainError;
use crate::media::{CropRect, Dimensions, EncodedImage, MediaLimits};
use crate::models::{BlogPost, BlogPostRecord, ContactMessage, MessageId, MessageInsert};
use crate::session::Session;
use async_trait::async_trait;
use bytes::Bytes;

/// Single-row settings document store.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ContentRepo: Send + Sync {
    /// Point lookup; `Ok(None)` when the row does not exist yet.
    async fn fetch_document(&self, id: i64) -> anyhow::Result<Option<serde_json::Value>>;

    async fn upsert_document(
        &self,
        session: &Session,
        id: i64,
        content: serde_json::Value,
    ) -> anyhow::Result<()>;
}

/// Blog table.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BlogRepo: Send + Sync {
    /// All posts, newest `date` first.
    async fn list_posts(&self) -> anyhow::Result<Vec<BlogPost>>;

    /// Insert-or-update by id.
    async fn upsert_posts(&self, session: &Session, posts: Vec<BlogPostRecord>) -> anyhow::Result<()>;
}

/// Contact messages table: public insert, authenticated everything else.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MessageRepo: Send + Sync {
    /// All messages, newest first.
    async fn list_messages(&self, session: &Session) -> anyhow::Result<Vec<ContactMessage>>;

    async fn insert_message(&self, message: MessageInsert) -> anyhow::Result<()>;

    async fn set_read(&self, session: &Session, id: &MessageId, is_read: bool) -> anyhow::Result<()>;

    /// Deleting an id that does not exist is not an error.
    async fn delete_message(&self, session: &Session, id: &MessageId) -> anyhow::Result<()>;
}

/// Publicly readable object storage.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Stores `data` under `path`. Existing objects are not protected.
    async fn put_object(
        &self,
        session: &Session,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> anyhow::Result<()>;

    /// Returns the public URL of the object at `path`.
    fn public_url(&self, path: &str) -> String;
}

/// Email/password identity contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Rejections come back as [`DomainError::Unauthorized`] with a message fit for display.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, DomainError>;

    async fn sign_out(&self, session: &Session) -> anyhow::Result<()>;
}

/// Pixel work for the ingestion pipeline. CPU-bound and synchronous; callers
/// run it off the async executor.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait MediaProcessor: Send + Sync {
    /// Reads the size of an encoded image.
    fn dimensions(&self, source: &[u8]) -> Result<Dimensions, DomainError>;

    /// Decodes `source`, cuts out `crop` at 1:1 scale and encodes the result.
    fn rasterize(&self, source: &[u8], crop: CropRect, quality: u8) -> Result<EncodedImage, DomainError>;

    /// Shrinks the encoding towards `limits.max_bytes` without changing its pixel size.
    fn compress(&self, image: EncodedImage, limits: &MediaLimits) -> Result<EncodedImage, DomainError>;
}
