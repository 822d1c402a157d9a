use super::crop::CropSelection;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use domains::{AspectRatio, CropRect, Dimensions, Slot};
use std::path::Path;

/// A picked source file, bound to the slot it will end up in.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
    pub slot: Slot,
    pub dimensions: Dimensions,
}

impl Selection {
    pub fn aspect_ratio(&self) -> AspectRatio {
        self.slot.aspect_ratio()
    }

    /// Inline `data:` URL of the untouched source, for previews.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }

    /// Crop window at zoom 1, centred.
    pub fn crop_selection(&self) -> CropSelection {
        CropSelection::new(self.dimensions, self.aspect_ratio())
    }

    pub fn default_crop(&self) -> CropRect {
        self.crop_selection().to_rect()
    }

    /// Base name without extension, used to name the upload.
    pub fn stem(&self) -> &str {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("image")
    }
}

/// MIME type from the file name, `application/octet-stream` when unknown.
pub(crate) fn guess_content_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(file_name: &str, slot: Slot) -> Selection {
        Selection {
            file_name: file_name.into(),
            content_type: guess_content_type(file_name),
            bytes: Bytes::from_static(b"\x89PNG"),
            slot,
            dimensions: Dimensions { width: 1200, height: 800 },
        }
    }

    #[test]
    fn content_type_from_extension() {
        assert_eq!(guess_content_type("a.JPG"), "image/jpeg");
        assert_eq!(guess_content_type("logo.png"), "image/png");
        assert_eq!(guess_content_type("mystery"), "application/octet-stream");
    }

    #[test]
    fn data_url_embeds_source() {
        let sel = selection("logo.png", Slot::Logo);
        assert_eq!(sel.data_url(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn slot_drives_aspect_and_default_crop() {
        let sel = selection("cover.final.jpg", Slot::BlogCover { post_id: "9".into() });
        assert_eq!(sel.aspect_ratio(), AspectRatio::WIDE_16_10);
        assert_eq!(sel.default_crop(), CropRect::new(0, 25, 1200, 750));
        assert_eq!(sel.stem(), "cover.final");
        assert_eq!(selection(".jpg", Slot::Logo).stem(), ".jpg");
    }
}
