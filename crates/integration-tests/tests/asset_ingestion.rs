//! Select → crop → compress → upload → splice with the real image processor.

use domains::{BlogPost, CropRect, DomainError, MediaLimits, SiteContent, Slot};
use integration_tests::{decoded_size, noisy_png, translucent_png, LocalSite};
use services::{AssetPipeline, SyncStatus};
use std::sync::Arc;
use storage_adapters::ImageMediaProcessor;

fn pipeline() -> AssetPipeline {
    AssetPipeline::new(Arc::new(ImageMediaProcessor::new()), MediaLimits::default())
}

#[tokio::test]
async fn uploaded_image_has_the_confirmed_crop_size() {
    let site = LocalSite::new();
    let mut admin = site.admin_store().await;
    let pipeline = pipeline();

    let selection = pipeline
        .select_bytes("depan toko.png", noisy_png(640, 480), Slot::HeroImage)
        .unwrap();
    let crop = CropRect::new(17, 33, 320, 180);
    let url = pipeline.ingest(&mut admin, &selection, crop).await.unwrap();

    let (data, content_type) = site.uploaded(&url).unwrap();
    assert_eq!(content_type, "image/jpeg");
    assert_eq!(decoded_size(&data), (320, 180));
    assert!(data.len() <= MediaLimits::default().max_bytes);
    assert!(url.starts_with("https://media.pixel.test/uploads/"));
    assert!(url.ends_with("-depan-toko.jpg"));
    assert_eq!(admin.hero_settings().images.last(), Some(&url));
}

#[tokio::test]
async fn zoomed_crop_keeps_slot_aspect_and_size() {
    let site = LocalSite::new();
    let mut admin = site.admin_store().await;
    let pipeline = pipeline();

    let selection = pipeline
        .select_bytes("about.png", noisy_png(500, 700), Slot::AboutImage)
        .unwrap();
    let crop = selection.crop_selection().with_zoom(2.0).centred_at(180.0, 260.0).to_rect();
    assert!(crop.width < 500);

    let url = pipeline.ingest(&mut admin, &selection, crop).await.unwrap();
    let (data, _) = site.uploaded(&url).unwrap();
    let (width, height) = decoded_size(&data);
    assert_eq!((width, height), (crop.width, crop.height));
    assert_eq!(admin.about_settings().image, url);
}

#[tokio::test]
async fn transparent_logo_stays_png() {
    let site = LocalSite::new();
    let mut admin = site.admin_store().await;
    let pipeline = pipeline();

    let selection = pipeline
        .select_bytes("logo.png", translucent_png(96), Slot::Logo)
        .unwrap();
    let url = pipeline
        .ingest(&mut admin, &selection, selection.default_crop())
        .await
        .unwrap();

    let (data, content_type) = site.uploaded(&url).unwrap();
    assert_eq!(content_type, "image/png");
    assert!(url.ends_with("-logo.png"));
    assert_eq!(decoded_size(&data), (96, 96));
    assert_eq!(admin.hero_settings().logo.as_deref(), Some(url.as_str()));
}

#[tokio::test]
async fn tight_budget_never_changes_pixel_size() {
    let site = LocalSite::new();
    let mut admin = site.admin_store().await;
    let limits = MediaLimits {
        max_bytes: 8_000,
        ..MediaLimits::default()
    };
    let pipeline = AssetPipeline::new(Arc::new(ImageMediaProcessor::new()), limits);

    let selection = pipeline
        .select_bytes("galeri.png", noisy_png(300, 400), Slot::GalleryImage)
        .unwrap();
    let url = pipeline
        .ingest(&mut admin, &selection, CropRect::new(0, 0, 300, 400))
        .await
        .unwrap();

    let (data, _) = site.uploaded(&url).unwrap();
    assert_eq!(decoded_size(&data), (300, 400));
    assert_eq!(admin.hero_settings().gallery_images, vec![url]);
}

#[tokio::test]
async fn anonymous_ingest_uploads_nothing() {
    let site = LocalSite::new();
    let mut visitor = site.store();
    let pipeline = pipeline();
    let selection = pipeline
        .select_bytes("hero.png", noisy_png(64, 36), Slot::HeroImage)
        .unwrap();

    let err = pipeline
        .ingest(&mut visitor, &selection, selection.default_crop())
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Unauthorized(_)));
    assert!(site.media.is_empty());
    assert_eq!(visitor.content(), &SiteContent::default());
}

#[tokio::test]
async fn undecodable_file_is_rejected_at_selection() {
    let pipeline = pipeline();
    let err = pipeline
        .select_bytes("notes.png", bytes::Bytes::from_static(b"not an image"), Slot::Logo)
        .unwrap_err();
    assert!(matches!(err, DomainError::Media(_)));
}

#[tokio::test]
async fn cover_for_a_deleted_post_is_uploaded_but_not_spliced() {
    let site = LocalSite::new();
    let mut admin = site.admin_store().await;
    admin.set_blog_posts(vec![BlogPost {
        id: "5".into(),
        title: "Pomade vs Clay".into(),
        ..BlogPost::default()
    }]);
    let pipeline = pipeline();

    let selection = pipeline
        .select_bytes("cover.png", noisy_png(320, 200), Slot::BlogCover { post_id: "6".into() })
        .unwrap();
    pipeline
        .ingest(&mut admin, &selection, selection.default_crop())
        .await
        .unwrap();

    assert_eq!(site.media.len(), 1);
    assert_eq!(admin.blog_posts()[0].cover_image, "");
}

#[tokio::test]
async fn ingested_url_survives_publish_and_fetch() {
    let site = LocalSite::new();
    let mut admin = site.admin_store().await;
    let pipeline = pipeline();

    let selection = pipeline
        .select_bytes("ig.png", noisy_png(200, 200), Slot::SocialIcon { index: 0 })
        .unwrap();
    let url = pipeline
        .ingest(&mut admin, &selection, selection.default_crop())
        .await
        .unwrap();
    assert_eq!(admin.publish().await, SyncStatus::Success);

    let mut visitor = site.store();
    visitor.fetch().await;
    assert_eq!(visitor.contact_settings().socials[0].icon, url);
}
