//! The set of adapters a [`ContentStore`](crate::ContentStore) talks to.

use domains::{AuthProvider, BlogRepo, ContentRepo, MediaStorage, MessageRepo};
use std::sync::Arc;

/// Remote persistence, storage and identity, wired together at startup.
///
/// Using dynamic dispatch so the binary can pick hosted or local adapters
/// from configuration.
#[derive(Clone)]
pub struct Backend {
    pub content: Arc<dyn ContentRepo>,
    pub blog: Arc<dyn BlogRepo>,
    pub messages: Arc<dyn MessageRepo>,
    pub media: Arc<dyn MediaStorage>,
    pub auth: Arc<dyn AuthProvider>,
}

impl Backend {
    /// Builds a backend from one adapter that serves all three tables.
    pub fn from_repos<R>(repos: Arc<R>, media: Arc<dyn MediaStorage>, auth: Arc<dyn AuthProvider>) -> Self
    where
        R: ContentRepo + BlogRepo + MessageRepo + 'static,
    {
        Self {
            content: repos.clone(),
            blog: repos.clone(),
            messages: repos,
            media,
            auth,
        }
    }
}
