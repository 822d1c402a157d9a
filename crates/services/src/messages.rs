//! Contact-message inbox operations on [`ContentStore`].
//!
//! Reads and writes require a session, except [`ContentStore::send_message`]
//! which is the public contact form.

use crate::store::ContentStore;
use domains::{MessageDraft, MessageId};
use tracing::{debug, error, info, warn};

impl ContentStore {
    /// Replaces the local inbox with the remote list, newest first.
    pub async fn fetch_messages(&mut self) {
        let (Some(backend), Some(session)) = (self.backend.clone(), self.session.as_ref()) else {
            debug!("message fetch skipped: backend not configured or not signed in");
            return;
        };
        match backend.messages.list_messages(session).await {
            Ok(messages) => {
                debug!(count = messages.len(), "messages fetched");
                self.content.messages = messages;
            }
            Err(err) => error!(error = %format!("{err:#}"), "message fetch failed"),
        }
    }

    /// Submits the public contact form. Returns whether the insert succeeded.
    pub async fn send_message(&self, draft: MessageDraft) -> bool {
        let Some(backend) = self.backend.as_ref() else {
            debug!("message not sent: backend not configured");
            return false;
        };
        match backend.messages.insert_message(draft.into_insert()).await {
            Ok(()) => {
                info!("contact message received");
                true
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "contact message insert failed");
                false
            }
        }
    }

    /// Flips the read flag locally, then remotely. A remote failure is
    /// logged and the local flag is kept.
    pub async fn update_message_status(&mut self, id: &MessageId, is_read: bool) {
        let (Some(backend), Some(session)) = (self.backend.clone(), self.session.as_ref()) else {
            debug!("message status update skipped: backend not configured or not signed in");
            return;
        };

        // 1. Optimistic local update
        for message in self.content.messages.iter_mut().filter(|m| m.id.matches(id)) {
            message.is_read = is_read;
        }

        // 2. Remote update
        if let Err(err) = backend.messages.set_read(session, &id.normalized(), is_read).await {
            warn!(%id, error = %format!("{err:#}"), "message status not saved remotely");
        }
    }

    /// Deletes a message remotely and reconciles the inbox by re-fetching.
    ///
    /// Unlike the other inbox operations, a failure is returned to the caller.
    pub async fn delete_message(&mut self, id: &MessageId) -> domains::Result<()> {
        let (Some(backend), Some(session)) = (self.backend.clone(), self.session.as_ref()) else {
            debug!("message delete skipped: backend not configured or not signed in");
            return Ok(());
        };

        let id = id.normalized();
        if let Err(err) = backend.messages.delete_message(session, &id).await {
            error!(%id, error = %format!("{err:#}"), "message delete failed");
            return Err(err.into());
        }
        info!(%id, "message deleted");
        self.fetch_messages().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::Backend;
    use crate::store::ContentStore;
    use chrono::Utc;
    use domains::{
        ContactMessage, DomainError, MessageDraft, MessageId, MockAuthProvider, MockBlogRepo,
        MockContentRepo, MockMediaStorage, MockMessageRepo, Session,
    };
    use mockall::predicate::eq;
    use secrecy::SecretString;
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    fn backend(messages: MockMessageRepo) -> Backend {
        Backend {
            content: Arc::new(MockContentRepo::new()),
            blog: Arc::new(MockBlogRepo::new()),
            messages: Arc::new(messages),
            media: Arc::new(MockMediaStorage::new()),
            auth: Arc::new(MockAuthProvider::new()),
        }
    }

    fn message(id: i64, is_read: bool) -> ContactMessage {
        ContactMessage {
            id: MessageId::Int(id),
            name: "Budi".into(),
            email: "budi@example.com".into(),
            phone: String::new(),
            message: "Mau booking".into(),
            is_read,
            created_at: Utc::now(),
        }
    }

    fn signed_in(repo: MockMessageRepo) -> ContentStore {
        let mut store = ContentStore::new(Some(backend(repo)));
        store.session = Some(Session::new("u1", "admin@pixel.id", SecretString::from("t")));
        store
    }

    #[tokio::test]
    async fn send_message_is_public_and_unread() {
        let mut repo = MockMessageRepo::new();
        repo.expect_insert_message()
            .withf(|row| !row.is_read && row.draft.name == "Budi")
            .times(1)
            .returning(|_| Ok(()));
        let store = ContentStore::new(Some(backend(repo)));

        let sent = store
            .send_message(MessageDraft {
                name: "Budi".into(),
                ..MessageDraft::default()
            })
            .await;
        assert!(sent);
    }

    #[tokio::test]
    async fn send_message_reports_failure() {
        let mut repo = MockMessageRepo::new();
        repo.expect_insert_message()
            .returning(|_| Err(anyhow::anyhow!("row-level security")));
        let store = ContentStore::new(Some(backend(repo)));
        assert!(!store.send_message(MessageDraft::default()).await);
        assert!(!ContentStore::new(None).send_message(MessageDraft::default()).await);
    }

    #[tokio::test]
    async fn status_update_is_optimistic() {
        let mut repo = MockMessageRepo::new();
        repo.expect_set_read()
            .with(mockall::predicate::always(), eq(MessageId::Int(3)), eq(true))
            .times(1)
            .returning(|_, _, _| Err(anyhow::anyhow!("timeout")));
        let mut store = signed_in(repo);
        store.set_messages(vec![message(3, false), message(4, false)]);

        store.update_message_status(&MessageId::Text("3".into()), true).await;

        // Remote failed, local flag stays flipped.
        assert!(store.messages()[0].is_read);
        assert!(!store.messages()[1].is_read);
    }

    #[tokio::test]
    async fn delete_normalizes_id_and_refetches() {
        let mut repo = MockMessageRepo::new();
        repo.expect_delete_message()
            .withf(|_, id| *id == MessageId::Int(7))
            .times(1)
            .returning(|_, _| Ok(()));
        repo.expect_list_messages()
            .times(1)
            .returning(|_| Ok(vec![message(8, true)]));
        let mut store = signed_in(repo);
        store.set_messages(vec![message(7, false), message(8, true)]);

        assert_ok!(store.delete_message(&"7".parse().unwrap()).await);
        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].id, MessageId::Int(8));
    }

    #[tokio::test]
    async fn delete_failure_is_returned() {
        let mut repo = MockMessageRepo::new();
        repo.expect_delete_message()
            .returning(|_, _| Err(anyhow::anyhow!("permission denied")));
        let mut store = signed_in(repo);
        store.set_messages(vec![message(1, false)]);

        let err = assert_err!(store.delete_message(&MessageId::Int(1)).await);
        assert!(matches!(err, DomainError::Remote(_)));
        assert_eq!(store.messages().len(), 1);
    }

    #[tokio::test]
    async fn inbox_requires_session() {
        let mut store = ContentStore::new(Some(backend(MockMessageRepo::new())));
        store.fetch_messages().await;
        store.update_message_status(&MessageId::Int(1), true).await;
        assert_ok!(store.delete_message(&MessageId::Int(1)).await);
        assert!(store.messages().is_empty());
    }
}
