//! crates/configs/src/lib.rs
//!
//! Layered settings for the Pixel admin tools.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. `.env` (loaded into the process environment by `dotenvy`)
//! 4. environment variables `PIXEL__{SECTION}__{KEY}`, e.g. `PIXEL__BACKEND__URL`

use config::{Config, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const ENV_PREFIX: &str = "PIXEL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendSettings,
    pub local: LocalSettings,
    pub admin: AdminSettings,
    pub media: MediaSettings,
    pub publish: PublishSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Loads `.env`, then `path` (if given and present), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Ok(env_file) = dotenvy::dotenv() {
            debug!(path = %env_file.display(), ".env loaded");
        }
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses settings from TOML text only; used by tests and tooling.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(raw, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.media;
        if m.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid("media.max_upload_bytes must be positive".into()));
        }
        if !(1..=100).contains(&m.initial_quality) || !(1..=100).contains(&m.min_quality) {
            return Err(ConfigError::Invalid("media qualities must be within 1..=100".into()));
        }
        if m.min_quality > m.initial_quality {
            return Err(ConfigError::Invalid(
                "media.min_quality cannot exceed media.initial_quality".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Remote tables, storage and auth
    Hosted,
    /// JSON snapshot, local files and an argon2 admin account
    #[default]
    Local,
    /// No backend: content is read-only defaults
    None,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub mode: BackendMode,
    pub url: String,
    pub anon_key: Option<SecretString>,
    pub bucket: String,
    pub document_table: String,
    pub blog_table: String,
    pub messages_table: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            mode: BackendMode::default(),
            url: String::new(),
            anon_key: None,
            bucket: "site-assets".into(),
            document_table: "site_content".into(),
            blog_table: "blog_posts".into(),
            messages_table: "contact_messages".into(),
        }
    }
}

impl BackendSettings {
    /// URL and key for hosted mode, if both are present and non-blank.
    pub fn hosted_credentials(&self) -> Option<(&str, &SecretString)> {
        let key = self.anon_key.as_ref()?;
        if self.url.trim().is_empty() || key.expose_secret().trim().is_empty() {
            return None;
        }
        Some((self.url.trim(), key))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocalSettings {
    pub snapshot_path: PathBuf,
    pub media_root: PathBuf,
    pub public_url_prefix: String,
    pub admin_email: String,
    /// Argon2 PHC string; see `pixel-admin hash-password`
    pub admin_password_hash: Option<String>,
}

impl Default for LocalSettings {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("./data/site.json"),
            media_root: PathBuf::from("./data/assets"),
            public_url_prefix: "/assets".into(),
            admin_email: "admin@pixel.id".into(),
            admin_password_hash: None,
        }
    }
}

/// Credentials the CLI signs in with before privileged commands.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    pub email: Option<String>,
    pub password: Option<SecretString>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    pub max_upload_bytes: usize,
    pub initial_quality: u8,
    pub min_quality: u8,
    pub quality_step: u8,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            max_upload_bytes: 209_715,
            initial_quality: 85,
            min_quality: 30,
            quality_step: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PublishSettings {
    /// How long a publish outcome stays visible before returning to idle
    pub status_reset_ms: u64,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self { status_reset_ms: 3_000 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive; `RUST_LOG` wins when set
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::default(),
        }
    }
}
