//! crates/services/src/lib.rs
//!
//! Application services for the Pixel site: the content store and the
//! image ingestion pipeline. Adapters are injected through [`Backend`].

pub mod backend;
pub mod editing;
pub mod ids;
pub mod ingest;
pub mod messages;
pub mod store;
pub mod sync;

pub use backend::Backend;
pub use editing::IconTarget;
pub use ids::IdClock;
pub use ingest::{AssetPipeline, CropSelection, Selection};
pub use store::ContentStore;
pub use sync::{SyncStatus, SyncTracker};
