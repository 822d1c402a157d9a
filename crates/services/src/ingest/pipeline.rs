use super::selection::{guess_content_type, Selection};
use crate::store::ContentStore;
use bytes::Bytes;
use domains::{CropRect, DomainError, EncodedImage, MediaLimits, MediaProcessor, Slot};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Crop, compress, upload and splice, one image at a time.
pub struct AssetPipeline {
    processor: Arc<dyn MediaProcessor>,
    limits: MediaLimits,
    busy: Arc<AtomicBool>,
}

/// Clears the busy flag on every exit path.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl AssetPipeline {
    pub fn new(processor: Arc<dyn MediaProcessor>, limits: MediaLimits) -> Self {
        Self {
            processor,
            limits,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn limits(&self) -> &MediaLimits {
        &self.limits
    }

    /// True while an ingest is between crop and splice.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Reads a local file and binds it to `slot`.
    pub async fn select(&self, path: impl AsRef<Path>, slot: Slot) -> domains::Result<Selection> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DomainError::Media(format!("cannot read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.select_bytes(file_name, Bytes::from(bytes), slot)
    }

    /// Binds in-memory image bytes to `slot`. The image is decoded only far
    /// enough to learn its size.
    pub fn select_bytes(&self, file_name: impl Into<String>, bytes: Bytes, slot: Slot) -> domains::Result<Selection> {
        let file_name = file_name.into();
        let dimensions = self.processor.dimensions(&bytes)?;
        debug!(%file_name, slot = slot.label(), width = dimensions.width, height = dimensions.height, "image selected");
        Ok(Selection {
            content_type: guess_content_type(&file_name),
            file_name,
            bytes,
            slot,
            dimensions,
        })
    }

    /// Runs the confirmed crop through to a public URL written into the slot.
    ///
    /// Nothing is written to the content if any step fails. A slot whose
    /// target disappeared in the meantime still returns the uploaded URL.
    pub async fn ingest(&self, store: &mut ContentStore, selection: &Selection, crop: CropRect) -> domains::Result<String> {
        if !store.is_configured() {
            return Err(DomainError::NotConfigured);
        }
        if !store.is_authenticated() {
            return Err(DomainError::Unauthorized("sign in to upload images".into()));
        }
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(DomainError::Validation("another image is still being processed".into()));
        }
        let _guard = BusyGuard(Arc::clone(&self.busy));

        if !crop.fits_within(selection.dimensions) {
            return Err(DomainError::Validation(format!(
                "crop {}x{}+{}+{} is outside the {}x{} image",
                crop.width, crop.height, crop.x, crop.y, selection.dimensions.width, selection.dimensions.height
            )));
        }

        // 1. Rasterize and compress off the async executor
        let image = self.process(selection.bytes.clone(), crop).await.inspect_err(|err| {
            error!(slot = selection.slot.label(), error = %err, "image processing failed");
        })?;

        // 2. Upload
        let file_name = format!("{}.{}", selection.stem(), image.format.extension());
        let size = image.len();
        let url = store
            .upload_file(&file_name, image.data, image.format.mime_type())
            .await
            .inspect_err(|err| error!(slot = selection.slot.label(), error = %err, "image upload failed"))?;

        // 3. Splice
        store.apply_asset(&selection.slot, url.clone());
        info!(slot = selection.slot.label(), width = crop.width, height = crop.height, size, %url, "image ingested");
        Ok(url)
    }

    async fn process(&self, source: Bytes, crop: CropRect) -> domains::Result<EncodedImage> {
        let processor = Arc::clone(&self.processor);
        let limits = self.limits;
        let image = tokio::task::spawn_blocking(move || {
            let raster = processor.rasterize(&source, crop, limits.initial_quality)?;
            processor.compress(raster, &limits)
        })
        .await
        .map_err(|e| DomainError::Media(format!("image worker stopped: {e}")))??;

        if image.len() > self.limits.max_bytes {
            warn!(size = image.len(), max = self.limits.max_bytes, "image still above upload budget at lowest quality");
        }
        Ok(image)
    }
}
