//! crates/storage-adapters/src/lib.rs
//!
//! Persistence, object storage and image processing behind the `domains`
//! ports. The memory backend and local media store back `local` mode; the
//! hosted client needs the `hosted` feature.

pub mod imaging;
pub mod local_media;
pub mod memory;

#[cfg(feature = "hosted")]
pub mod hosted;

pub use imaging::ImageMediaProcessor;
pub use local_media::LocalMediaStore;
pub use memory::{MemoryBackend, MemoryMediaStore, Snapshot};

#[cfg(feature = "hosted")]
pub use hosted::{HostedClient, HostedConfig};
