//! # ContentStore
//!
//! Holds the editable snapshot of all site content and mediates between it
//! and the remote backend.
//!
//! Edits are local and optimistic: setters replace one slice in memory and
//! never write through. Persistence happens only in [`ContentStore::publish`],
//! which always sends the whole aggregate.

use crate::backend::Backend;
use crate::ids::IdClock;
use crate::sync::{SyncStatus, SyncTracker, DEFAULT_STATUS_RESET};
use bytes::Bytes;
use chrono::Utc;
use domains::{
    AboutSettings, BlogPost, BlogPostRecord, Branch, ContactMessage, ContactSettings,
    ContentDocument, Course, DomainError, Facility, HeroSettings, Job, RejectedKey, Service,
    Session, SiteContent, Slot, SITE_DOCUMENT_ID,
};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Object key prefix for every upload.
pub const UPLOAD_PREFIX: &str = "uploads";

pub struct ContentStore {
    pub(crate) backend: Option<Backend>,
    pub(crate) content: SiteContent,
    pub(crate) session: Option<Session>,
    pub(crate) ids: IdClock,
    sync: SyncTracker,
    loading: bool,
}

impl ContentStore {
    /// A store seeded with the default content.
    ///
    /// `None` means the backend could not be configured: the store still
    /// serves content, and every remote path quietly does nothing.
    pub fn new(backend: Option<Backend>) -> Self {
        let loading = backend.is_some();
        Self {
            backend,
            content: SiteContent::default(),
            session: None,
            ids: IdClock::new(),
            sync: SyncTracker::new(DEFAULT_STATUS_RESET),
            loading,
        }
    }

    /// Overrides how long a publish outcome stays visible.
    pub fn with_status_reset(mut self, reset_after: Duration) -> Self {
        self.sync = SyncTracker::new(reset_after);
        self
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// True until the first fetch finishes.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn content(&self) -> &SiteContent {
        &self.content
    }

    /// In-place edit of several slices at once. Same contract as the setters.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut SiteContent) -> R) -> R {
        f(&mut self.content)
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.sync.status()
    }

    pub fn subscribe_sync(&self) -> watch::Receiver<SyncStatus> {
        self.sync.subscribe()
    }

    /// Reads the settings document and the blog list.
    ///
    /// Keys present in the document replace their slice; absent keys keep
    /// the current value. Failures are logged and leave state as it was.
    pub async fn fetch(&mut self) {
        let Some(backend) = self.backend.clone() else {
            debug!("fetch skipped: backend not configured");
            return;
        };
        self.loading = true;

        // 1. Settings document
        match backend.content.fetch_document(SITE_DOCUMENT_ID).await {
            Ok(Some(raw)) => match ContentDocument::from_value_per_key(raw) {
                Ok((doc, rejected)) => {
                    for RejectedKey { key, error } in &rejected {
                        warn!(key, error = %error, "content document key is malformed; keeping local slice");
                    }
                    let applied = self.content.merge_document(doc);
                    info!(keys = ?applied, "content document applied");
                }
                Err(err) => error!(error = %err, "content document is malformed; keeping local content"),
            },
            Ok(None) => debug!("no content document stored yet"),
            Err(err) => error!(error = %format!("{err:#}"), "cloud fetch failed"),
        }

        // 2. Blog posts, newest first
        match backend.blog.list_posts().await {
            Ok(posts) => {
                debug!(count = posts.len(), "blog posts fetched");
                self.content.blog_posts = posts;
            }
            Err(err) => error!(error = %format!("{err:#}"), "blog fetch failed"),
        }

        self.loading = false;
    }

    /// Writes the whole aggregate to the backend.
    ///
    /// Without a session this is a no-op that leaves the status at idle.
    /// Returns the outcome status (before the timed reset).
    pub async fn publish(&self) -> SyncStatus {
        let (Some(backend), Some(session)) = (self.backend.as_ref(), self.session.as_ref()) else {
            debug!("publish skipped: backend not configured or not signed in");
            return self.sync.status();
        };

        self.sync.begin();
        let outcome = match self.push(backend, session).await {
            Ok(()) => {
                info!(blog_posts = self.content.blog_posts.len(), "content published");
                SyncStatus::Success
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "publishing failed");
                SyncStatus::Error
            }
        };
        self.sync.finish(outcome);
        outcome
    }

    async fn push(&self, backend: &Backend, session: &Session) -> anyhow::Result<()> {
        // 1. General site content, one document
        let document = serde_json::to_value(self.content.document())?;
        backend
            .content
            .upsert_document(session, SITE_DOCUMENT_ID, document)
            .await?;

        // 2. Blog posts go to their own table; a failure here does not undo step 1
        if !self.content.blog_posts.is_empty() {
            let rows: Vec<BlogPostRecord> = self.content.blog_posts.iter().map(BlogPostRecord::from).collect();
            backend.blog.upsert_posts(session, rows).await?;
        }
        Ok(())
    }

    /// Email/password sign-in. On success the message inbox is loaded.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> domains::Result<()> {
        let Some(backend) = self.backend.clone() else {
            return Err(DomainError::NotConfigured);
        };
        let session = backend.auth.sign_in(email, password).await?;
        info!(user = %session.email, "signed in");
        self.session = Some(session);
        self.fetch_messages().await;
        Ok(())
    }

    /// Ends the session locally whether or not the provider acknowledges it.
    pub async fn sign_out(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        if let Some(backend) = &self.backend {
            if let Err(err) = backend.auth.sign_out(&session).await {
                warn!(error = %format!("{err:#}"), "sign-out not acknowledged by provider");
            }
        }
        self.content.messages.clear();
        info!(user = %session.email, "signed out");
    }

    /// Stores a file under `uploads/{unix millis}-{name}` and returns its public URL.
    pub async fn upload_file(&self, file_name: &str, data: Bytes, content_type: &str) -> domains::Result<String> {
        let Some(backend) = self.backend.as_ref() else {
            return Err(DomainError::NotConfigured);
        };
        let Some(session) = self.session.as_ref() else {
            return Err(DomainError::Unauthorized("sign in to upload files".into()));
        };

        let path = object_path(Utc::now().timestamp_millis(), file_name);
        let size = data.len();
        backend.media.put_object(session, &path, data, content_type).await?;
        let url = backend.media.public_url(&path);
        info!(%path, size, "file uploaded");
        Ok(url)
    }

    /// Writes an uploaded URL into its slot.
    pub fn apply_asset(&mut self, slot: &Slot, url: String) -> bool {
        let applied = self.content.apply_asset(slot, url);
        if !applied {
            warn!(slot = slot.label(), "asset slot target no longer exists; URL not applied");
        }
        applied
    }
}

/// Builds a storage key namespaced by upload time.
pub(crate) fn object_path(unix_millis: i64, file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let name = if cleaned.trim_matches(['-', '.']).is_empty() {
        "upload".to_string()
    } else {
        cleaned
    };
    format!("{UPLOAD_PREFIX}/{unix_millis}-{name}")
}

macro_rules! slice_accessors {
    ($($field:ident: $ty:ty => $setter:ident),+ $(,)?) => {
        impl ContentStore {
            $(
                pub fn $field(&self) -> &$ty {
                    &self.content.$field
                }

                /// Replaces the slice in memory only.
                pub fn $setter(&mut self, value: $ty) {
                    self.content.$field = value;
                }
            )+
        }
    };
}

slice_accessors! {
    services: Vec<Service> => set_services,
    facilities: Vec<Facility> => set_facilities,
    branches: Vec<Branch> => set_branches,
    jobs: Vec<Job> => set_jobs,
    courses: Vec<Course> => set_courses,
    blog_posts: Vec<BlogPost> => set_blog_posts,
    messages: Vec<ContactMessage> => set_messages,
    contact_settings: ContactSettings => set_contact_settings,
    hero_settings: HeroSettings => set_hero_settings,
    about_settings: AboutSettings => set_about_settings,
}
