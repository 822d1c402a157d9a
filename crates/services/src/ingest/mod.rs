//! # Asset Ingestion
//!
//! `select → crop → rasterize → compress → upload → splice`.
//!
//! Selection and crop geometry are pure. Pixel work goes through the
//! [`MediaProcessor`](domains::MediaProcessor) port on the blocking pool;
//! upload and splice go through the [`ContentStore`](crate::ContentStore).

mod crop;
mod pipeline;
mod selection;

pub use crop::{CropSelection, MAX_ZOOM, MIN_ZOOM};
pub use pipeline::AssetPipeline;
pub use selection::Selection;
