//! crates/integration-tests/src/lib.rs
//!
//! Fixtures shared by the test targets: the `local` adapter set (memory
//! tables, memory object storage, argon2 admin) wired into a [`Backend`].

use auth_adapters::{hash_password, SimpleAuthProvider};
use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use services::{Backend, ContentStore};
use std::io::Cursor;
use std::sync::{Arc, OnceLock};
use storage_adapters::{MemoryBackend, MemoryMediaStore};

pub const ADMIN_EMAIL: &str = "admin@pixel.id";
pub const ADMIN_PASSWORD: &str = "cukur-rapi-2024";
pub const MEDIA_URL_PREFIX: &str = "https://media.pixel.test";

/// Argon2 is slow in debug builds; hash once per test binary.
fn admin_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(ADMIN_PASSWORD).expect("hashing the fixture password"))
}

/// One site's worth of local adapters. Every store built from it shares state.
pub struct LocalSite {
    pub repos: Arc<MemoryBackend>,
    pub media: Arc<MemoryMediaStore>,
    pub backend: Backend,
}

impl LocalSite {
    pub fn new() -> Self {
        Self::with_repos(MemoryBackend::new())
    }

    pub fn with_repos(repos: MemoryBackend) -> Self {
        let repos = Arc::new(repos);
        let media = Arc::new(MemoryMediaStore::new(MEDIA_URL_PREFIX));
        let auth = SimpleAuthProvider::new(ADMIN_EMAIL, admin_hash());
        let backend = Backend::from_repos(repos.clone(), media.clone(), Arc::new(auth));
        Self { repos, media, backend }
    }

    /// A visitor's store: configured, never signed in.
    pub fn store(&self) -> ContentStore {
        ContentStore::new(Some(self.backend.clone()))
    }

    pub async fn admin_store(&self) -> ContentStore {
        let mut store = self.store();
        store
            .sign_in(ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .expect("fixture admin signs in");
        store
    }

    /// Bytes of an uploaded object, looked up by its public URL.
    pub fn uploaded(&self, url: &str) -> Option<(Bytes, String)> {
        self.media.get(self.media.path_of(url)?)
    }
}

impl Default for LocalSite {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque RGB noise, PNG-encoded. Noise keeps JPEG sizes realistic.
pub fn noisy_png(width: u32, height: u32) -> Bytes {
    let mut state: u32 = 0x9e37_79b9;
    let img = RgbImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        Rgb([r, g, b])
    });
    encode(&DynamicImage::ImageRgb8(img))
}

/// Half-transparent square, PNG-encoded.
pub fn translucent_png(side: u32) -> Bytes {
    let img = RgbaImage::from_pixel(side, side, Rgba([20, 120, 220, 96]));
    encode(&DynamicImage::ImageRgba8(img))
}

fn encode(img: &DynamicImage) -> Bytes {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).expect("encoding fixture image");
    Bytes::from(buf.into_inner())
}

/// Pixel size of encoded image bytes.
pub fn decoded_size(data: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(data).expect("decoding uploaded image");
    (img.width(), img.height())
}
