//! # Local media storage
//!
//! Filesystem implementation of `MediaStorage`. Objects keep their storage
//! key as a relative path under the root, so `uploads/1700-logo.png` lands
//! at `{root}/uploads/1700-logo.png` and is served from
//! `{url_prefix}/uploads/1700-logo.png`.

use anyhow::{bail, Context};
use async_trait::async_trait;
use bytes::Bytes;
use domains::{MediaStorage, Session};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

pub struct LocalMediaStore {
    /// Root directory for all objects (e.g., "./data/assets")
    root_path: PathBuf,
    /// Public URL prefix (e.g., "/static/assets")
    url_prefix: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root_path: root.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// Maps a storage key to a file under the root. Keys that would escape
    /// the root are rejected.
    fn object_path(&self, key: &str) -> anyhow::Result<PathBuf> {
        let relative = Path::new(key);
        if key.is_empty() || !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            bail!("invalid object key `{key}`");
        }
        Ok(self.root_path.join(relative))
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStore {
    async fn put_object(&self, _session: &Session, path: &str, data: Bytes, _content_type: &str) -> anyhow::Result<()> {
        // 1. Resolve target
        let target = self.object_path(path)?;

        // 2. Ensure directory exists
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }

        // 3. Save, replacing any previous object
        fs::write(&target, &data)
            .await
            .with_context(|| format!("cannot write {}", target.display()))?;
        debug!(path = %target.display(), size = data.len(), "object stored");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.url_prefix, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use tokio_test::{assert_err, assert_ok};

    fn session() -> Session {
        Session::new("local-admin", "admin@pixel.id", SecretString::from("t"))
    }

    #[tokio::test]
    async fn stores_under_root_and_builds_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "/static/assets/");

        assert_ok!(
            store
                .put_object(&session(), "uploads/17-logo.png", Bytes::from_static(b"png"), "image/png")
                .await
        );

        let written = std::fs::read(dir.path().join("uploads/17-logo.png")).unwrap();
        assert_eq!(written, b"png");
        assert_eq!(store.public_url("uploads/17-logo.png"), "/static/assets/uploads/17-logo.png");
    }

    #[tokio::test]
    async fn rejects_keys_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "/a");
        for key in ["../escape.png", "/etc/passwd", "uploads/../../x", ""] {
            assert_err!(store.put_object(&session(), key, Bytes::new(), "image/png").await, "{key} accepted");
        }
    }
}
