//! # In-memory backend
//!
//! Implements the document, blog and message repositories on concurrent
//! maps. With a snapshot path every write is flushed to one JSON file, which
//! is what the admin CLI uses in `local` mode.

use anyhow::{bail, Context};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use dashmap::DashMap;
use domains::{
    BlogPost, BlogPostRecord, BlogRepo, ContactMessage, ContentRepo, MediaStorage, MessageId,
    MessageInsert, MessageRepo, Session,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// On-disk shape of a [`MemoryBackend`].
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub site_content: BTreeMap<i64, serde_json::Value>,
    pub blog_posts: Vec<BlogPost>,
    pub contact_messages: Vec<ContactMessage>,
}

pub struct MemoryBackend {
    documents: DashMap<i64, serde_json::Value>,
    posts: DashMap<String, BlogPost>,
    messages: DashMap<MessageId, ContactMessage>,
    next_message_id: AtomicI64,
    snapshot_path: Option<PathBuf>,
    /// Serializes snapshot writes
    flush_lock: Mutex<()>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self {
            documents: DashMap::new(),
            posts: DashMap::new(),
            messages: DashMap::new(),
            next_message_id: AtomicI64::new(1),
            snapshot_path: None,
            flush_lock: Mutex::new(()),
        }
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `path` if it exists and flushes every later write back to it.
    pub async fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let snapshot = match tokio::fs::read(&path).await {
            Ok(raw) => serde_json::from_slice::<Snapshot>(&raw)
                .with_context(|| format!("invalid snapshot {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no snapshot yet, starting empty");
                Snapshot::default()
            }
            Err(e) => return Err(e).with_context(|| format!("cannot read {}", path.display())),
        };
        let mut backend = Self::from_snapshot(snapshot);
        backend.snapshot_path = Some(path);
        Ok(backend)
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let backend = Self::new();
        for (id, doc) in snapshot.site_content {
            backend.documents.insert(id, doc);
        }
        for post in snapshot.blog_posts {
            backend.posts.insert(post.id.clone(), post);
        }
        let mut max_id = 0;
        for message in snapshot.contact_messages {
            let id = message.id.normalized();
            if let MessageId::Int(n) = id {
                max_id = max_id.max(n);
            }
            backend.messages.insert(id, message);
        }
        backend.next_message_id.store(max_id + 1, Ordering::SeqCst);
        backend
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut blog_posts: Vec<BlogPost> = self.posts.iter().map(|e| e.value().clone()).collect();
        sort_posts(&mut blog_posts);
        let mut contact_messages: Vec<ContactMessage> = self.messages.iter().map(|e| e.value().clone()).collect();
        sort_messages(&mut contact_messages);
        Snapshot {
            site_content: self.documents.iter().map(|e| (*e.key(), e.value().clone())).collect(),
            blog_posts,
            contact_messages,
        }
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    async fn flush(&self) -> anyhow::Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let _guard = self.flush_lock.lock().await;
        let raw = serde_json::to_vec_pretty(&self.snapshot())?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, raw)
            .await
            .with_context(|| format!("cannot write {}", path.display()))?;
        debug!(path = %path.display(), "snapshot written");
        Ok(())
    }
}

fn check_session(session: &Session) -> anyhow::Result<()> {
    if session.is_expired(Utc::now()) {
        bail!("session for {} has expired", session.email);
    }
    Ok(())
}

/// Newest `date` first; the id breaks ties.
fn sort_posts(posts: &mut [BlogPost]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
}

fn sort_messages(messages: &mut [ContactMessage]) {
    messages.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
}

#[async_trait]
impl ContentRepo for MemoryBackend {
    async fn fetch_document(&self, id: i64) -> anyhow::Result<Option<serde_json::Value>> {
        Ok(self.documents.get(&id).map(|doc| doc.value().clone()))
    }

    async fn upsert_document(&self, session: &Session, id: i64, content: serde_json::Value) -> anyhow::Result<()> {
        check_session(session)?;
        self.documents.insert(id, content);
        self.flush().await
    }
}

#[async_trait]
impl BlogRepo for MemoryBackend {
    async fn list_posts(&self) -> anyhow::Result<Vec<BlogPost>> {
        let mut posts: Vec<BlogPost> = self.posts.iter().map(|e| e.value().clone()).collect();
        sort_posts(&mut posts);
        Ok(posts)
    }

    async fn upsert_posts(&self, session: &Session, posts: Vec<BlogPostRecord>) -> anyhow::Result<()> {
        check_session(session)?;
        let now = Utc::now();
        for record in posts {
            // The server owns `created_at`: set once, kept on update.
            let created_at = self
                .posts
                .get(&record.id)
                .and_then(|existing| existing.created_at)
                .unwrap_or(now);
            let post = BlogPost {
                id: record.id,
                title: record.title,
                slug: record.slug,
                content: record.content,
                excerpt: record.excerpt,
                author: record.author,
                date: record.date,
                cover_image: record.cover_image,
                created_at: Some(created_at),
            };
            self.posts.insert(post.id.clone(), post);
        }
        self.flush().await
    }
}

#[async_trait]
impl MessageRepo for MemoryBackend {
    async fn list_messages(&self, session: &Session) -> anyhow::Result<Vec<ContactMessage>> {
        check_session(session)?;
        let mut messages: Vec<ContactMessage> = self.messages.iter().map(|e| e.value().clone()).collect();
        sort_messages(&mut messages);
        Ok(messages)
    }

    async fn insert_message(&self, message: MessageInsert) -> anyhow::Result<()> {
        let id = MessageId::Int(self.next_message_id.fetch_add(1, Ordering::SeqCst));
        let row = ContactMessage {
            id: id.clone(),
            name: message.draft.name,
            email: message.draft.email,
            phone: message.draft.phone,
            message: message.draft.message,
            is_read: message.is_read,
            created_at: Utc::now(),
        };
        self.messages.insert(id, row);
        self.flush().await
    }

    async fn set_read(&self, session: &Session, id: &MessageId, is_read: bool) -> anyhow::Result<()> {
        check_session(session)?;
        if let Some(mut row) = self.messages.get_mut(&id.normalized()) {
            row.is_read = is_read;
        }
        self.flush().await
    }

    async fn delete_message(&self, session: &Session, id: &MessageId) -> anyhow::Result<()> {
        check_session(session)?;
        if self.messages.remove(&id.normalized()).is_some() {
            info!(%id, "message removed");
        }
        self.flush().await
    }
}

/// Object storage kept in memory, for tests and previews.
pub struct MemoryMediaStore {
    objects: DashMap<String, (Bytes, String)>,
    url_prefix: String,
}

impl MemoryMediaStore {
    pub fn new(url_prefix: impl Into<String>) -> Self {
        Self {
            objects: DashMap::new(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// Stored bytes and content type at `path`.
    pub fn get(&self, path: &str) -> Option<(Bytes, String)> {
        self.objects.get(path).map(|e| e.value().clone())
    }

    /// Reverse of [`MediaStorage::public_url`].
    pub fn path_of<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(&self.url_prefix)?.strip_prefix('/')
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl MediaStorage for MemoryMediaStore {
    async fn put_object(&self, session: &Session, path: &str, data: Bytes, content_type: &str) -> anyhow::Result<()> {
        check_session(session)?;
        self.objects.insert(path.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.url_prefix, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::MessageDraft;
    use secrecy::SecretString;
    use serde_json::json;
    use tokio_test::assert_ok;

    fn session() -> Session {
        Session::new("local-admin", "admin@pixel.id", SecretString::from("t"))
    }

    fn draft(name: &str) -> MessageInsert {
        MessageDraft {
            name: name.into(),
            email: format!("{name}@example.com"),
            phone: String::new(),
            message: "Halo".into(),
        }
        .into_insert()
    }

    fn record(id: &str, date: &str) -> BlogPostRecord {
        BlogPostRecord::from(&BlogPost {
            id: id.into(),
            title: format!("Post {id}"),
            date: date.into(),
            ..BlogPost::default()
        })
    }

    #[tokio::test]
    async fn documents_round_trip_and_missing_is_none() {
        let backend = MemoryBackend::new();
        assert!(backend.fetch_document(1).await.unwrap().is_none());
        backend.upsert_document(&session(), 1, json!({ "jobs": [] })).await.unwrap();
        assert_eq!(backend.fetch_document(1).await.unwrap(), Some(json!({ "jobs": [] })));
    }

    #[tokio::test]
    async fn posts_are_newest_first_and_keep_created_at() {
        let backend = MemoryBackend::new();
        backend
            .upsert_posts(&session(), vec![record("1", "2024-01-05"), record("2", "2024-03-01")])
            .await
            .unwrap();
        let first = backend.list_posts().await.unwrap();
        assert_eq!(first[0].id, "2");
        let created = first[1].created_at;

        backend.upsert_posts(&session(), vec![record("1", "2024-01-06")]).await.unwrap();
        let posts = backend.list_posts().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].date, "2024-01-06");
        assert_eq!(posts[1].created_at, created);
    }

    #[tokio::test]
    async fn ties_on_date_list_by_id() {
        let backend = MemoryBackend::new();
        backend
            .upsert_posts(
                &session(),
                vec![record("3", "2024-02-01"), record("9", "2024-02-01"), record("5", "2024-02-01")],
            )
            .await
            .unwrap();
        let ids: Vec<String> = backend.list_posts().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["9", "5", "3"]);

        let mut messages: Vec<ContactMessage> = (1..=4)
            .map(|n| ContactMessage {
                id: MessageId::Int(n),
                name: format!("tamu {n}"),
                email: String::new(),
                phone: String::new(),
                message: "Halo".into(),
                is_read: false,
                created_at: chrono::DateTime::<Utc>::UNIX_EPOCH,
            })
            .collect();
        messages.swap(0, 2);
        sort_messages(&mut messages);
        let ids: Vec<MessageId> = messages.into_iter().map(|m| m.id).collect();
        assert_eq!(ids, (1..=4).rev().map(MessageId::Int).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn messages_lifecycle() {
        let backend = MemoryBackend::new();
        backend.insert_message(draft("budi")).await.unwrap();
        backend.insert_message(draft("sari")).await.unwrap();

        let listed = backend.list_messages(&session()).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|m| !m.is_read));

        assert_ok!(backend.set_read(&session(), &MessageId::Text("1".into()), true).await);
        assert_ok!(backend.delete_message(&session(), &MessageId::Int(2)).await);
        assert_ok!(backend.delete_message(&session(), &MessageId::Int(99)).await);

        let listed = backend.list_messages(&session()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "budi");
        assert!(listed[0].is_read);
    }

    #[tokio::test]
    async fn expired_sessions_cannot_write() {
        let backend = MemoryBackend::new();
        let expired = session().with_expiry(Utc::now() - chrono::Duration::minutes(1));
        assert!(backend.upsert_document(&expired, 1, json!({})).await.is_err());
        assert!(backend.list_messages(&expired).await.is_err());
    }

    #[tokio::test]
    async fn snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state/site.json");

        let backend = MemoryBackend::open(&path).await.unwrap();
        backend.upsert_document(&session(), 1, json!({ "facilities": [] })).await.unwrap();
        backend.insert_message(draft("budi")).await.unwrap();

        let reopened = MemoryBackend::open(&path).await.unwrap();
        assert_eq!(reopened.fetch_document(1).await.unwrap(), Some(json!({ "facilities": [] })));
        reopened.insert_message(draft("sari")).await.unwrap();
        let ids: Vec<MessageId> = reopened
            .list_messages(&session())
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert!(ids.contains(&MessageId::Int(1)));
        assert!(ids.contains(&MessageId::Int(2)));
    }

    #[tokio::test]
    async fn memory_media_urls() {
        let store = MemoryMediaStore::new("https://cdn.test/assets/");
        store
            .put_object(&session(), "uploads/1-a.jpg", Bytes::from_static(b"jpg"), "image/jpeg")
            .await
            .unwrap();
        let url = store.public_url("uploads/1-a.jpg");
        assert_eq!(url, "https://cdn.test/assets/uploads/1-a.jpg");
        assert_eq!(store.path_of(&url), Some("uploads/1-a.jpg"));
        assert_eq!(store.get("uploads/1-a.jpg").unwrap().1, "image/jpeg");
    }
}
