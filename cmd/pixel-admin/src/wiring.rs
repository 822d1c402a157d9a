//! Builds the adapter set selected by `backend.mode`.

use anyhow::Context;
use auth_adapters::SimpleAuthProvider;
use configs::{BackendMode, Settings};
use domains::MediaLimits;
use services::{AssetPipeline, Backend, ContentStore};
use std::sync::Arc;
use std::time::Duration;
use storage_adapters::{ImageMediaProcessor, LocalMediaStore, MemoryBackend};
use tracing::{info, warn};

#[cfg(feature = "hosted")]
use {
    auth_adapters::HostedAuthProvider,
    secrecy::{ExposeSecret, SecretString},
    storage_adapters::{HostedClient, HostedConfig},
};

/// `None` when the selected mode cannot be built; the store then runs read-only.
pub async fn build_backend(settings: &Settings) -> anyhow::Result<Option<Backend>> {
    match settings.backend.mode {
        BackendMode::Hosted => Ok(hosted_backend(settings)),
        BackendMode::Local => local_backend(settings).await.map(Some),
        BackendMode::None => {
            info!("backend disabled; serving built-in content");
            Ok(None)
        }
    }
}

#[cfg(feature = "hosted")]
fn hosted_backend(settings: &Settings) -> Option<Backend> {
    let backend = &settings.backend;
    let Some((url, key)) = backend.hosted_credentials() else {
        warn!("hosted backend needs backend.url and backend.anon_key; running read-only");
        return None;
    };

    // 1. Tables and storage
    let mut config = HostedConfig::new(url, SecretString::from(key.expose_secret().to_string()));
    config.bucket = backend.bucket.clone();
    config.document_table = backend.document_table.clone();
    config.blog_table = backend.blog_table.clone();
    config.messages_table = backend.messages_table.clone();
    let client = match HostedClient::new(config) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            warn!(error = %format!("{err:#}"), "hosted backend rejected; running read-only");
            return None;
        }
    };

    // 2. Auth
    let auth = HostedAuthProvider::new(url, SecretString::from(key.expose_secret().to_string()));

    info!(%url, bucket = %backend.bucket, "hosted backend ready");
    Some(Backend::from_repos(client.clone(), client, Arc::new(auth)))
}

#[cfg(not(feature = "hosted"))]
fn hosted_backend(_settings: &Settings) -> Option<Backend> {
    warn!("built without the `hosted` feature; running read-only");
    None
}

async fn local_backend(settings: &Settings) -> anyhow::Result<Backend> {
    let local = &settings.local;

    // 1. Tables
    let repos = MemoryBackend::open(&local.snapshot_path)
        .await
        .context("opening local snapshot")?;

    // 2. Media
    let media = LocalMediaStore::new(&local.media_root, &local.public_url_prefix);

    // 3. Auth
    let hash = local.admin_password_hash.clone().unwrap_or_else(|| {
        warn!("local.admin_password_hash is not set; sign-in will fail");
        String::new()
    });
    let auth = SimpleAuthProvider::new(&local.admin_email, hash);

    info!(
        snapshot = %local.snapshot_path.display(),
        media_root = %local.media_root.display(),
        "local backend ready"
    );
    Ok(Backend::from_repos(Arc::new(repos), Arc::new(media), Arc::new(auth)))
}

pub fn content_store(settings: &Settings, backend: Option<Backend>) -> ContentStore {
    ContentStore::new(backend).with_status_reset(Duration::from_millis(settings.publish.status_reset_ms))
}

pub fn asset_pipeline(settings: &Settings) -> AssetPipeline {
    let media = settings.media;
    let limits = MediaLimits {
        max_bytes: media.max_upload_bytes,
        initial_quality: media.initial_quality,
        min_quality: media.min_quality,
        quality_step: media.quality_step,
    };
    AssetPipeline::new(Arc::new(ImageMediaProcessor::new()), limits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn none_mode_is_read_only() {
        let settings = Settings::from_toml("[backend]\nmode = \"none\"\n").unwrap();
        assert!(build_backend(&settings).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn hosted_mode_without_credentials_degrades() {
        let settings = Settings::from_toml("[backend]\nmode = \"hosted\"\n").unwrap();
        assert!(build_backend(&settings).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn local_mode_opens_a_fresh_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let toml = format!(
            "[local]\nsnapshot_path = {:?}\nmedia_root = {:?}\n",
            dir.path().join("site.json"),
            dir.path().join("assets"),
        );
        let settings = Settings::from_toml(&toml).unwrap();
        let backend = build_backend(&settings).await.unwrap();
        let store = content_store(&settings, backend);
        assert!(store.is_configured());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn pipeline_limits_follow_media_settings() {
        let settings = Settings::from_toml("[media]\nmax_upload_bytes = 1000\nquality_step = 5\n").unwrap();
        let pipeline = asset_pipeline(&settings);
        assert_eq!(pipeline.limits().max_bytes, 1000);
        assert_eq!(pipeline.limits().quality_step, 5);
        assert_eq!(pipeline.limits().initial_quality, 85);
    }
}
