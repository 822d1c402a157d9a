//! # Asset Slots
//!
//! A [`Slot`] names the exact place in [`SiteContent`] an uploaded image URL
//! is written into. Each slot has a fixed crop aspect ratio.

use crate::content::SiteContent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width:height ratio a crop must follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub const SQUARE: AspectRatio = AspectRatio::new(1, 1);
    pub const PORTRAIT_4_5: AspectRatio = AspectRatio::new(4, 5);
    pub const PORTRAIT_3_4: AspectRatio = AspectRatio::new(3, 4);
    pub const WIDE_16_9: AspectRatio = AspectRatio::new(16, 9);
    pub const WIDE_16_10: AspectRatio = AspectRatio::new(16, 10);
    pub const BANNER_3_1: AspectRatio = AspectRatio::new(3, 1);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// The two reorderable image lists of the hero settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageList {
    Hero,
    Gallery,
}

/// Destination of an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "slot")]
pub enum Slot {
    /// Appended to the hero slideshow
    HeroImage,
    /// Appended to the gallery
    GalleryImage,
    Logo,
    /// Wide logo shown in the footer
    FooterLogo,
    /// Favicon
    WebsiteIcon,
    AboutImage,
    ServiceBackground,
    /// Cover of the blog post with this id
    BlogCover { post_id: String },
    /// Icon of the social link at this index
    SocialIcon { index: usize },
}

impl Slot {
    pub fn aspect_ratio(&self) -> AspectRatio {
        match self {
            Slot::WebsiteIcon | Slot::Logo | Slot::SocialIcon { .. } => AspectRatio::SQUARE,
            Slot::FooterLogo => AspectRatio::BANNER_3_1,
            Slot::AboutImage => AspectRatio::PORTRAIT_4_5,
            Slot::GalleryImage => AspectRatio::PORTRAIT_3_4,
            Slot::BlogCover { .. } => AspectRatio::WIDE_16_10,
            Slot::HeroImage | Slot::ServiceBackground => AspectRatio::WIDE_16_9,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Slot::HeroImage => "hero",
            Slot::GalleryImage => "gallery",
            Slot::Logo => "logo",
            Slot::FooterLogo => "footer_logo",
            Slot::WebsiteIcon => "icon",
            Slot::AboutImage => "about",
            Slot::ServiceBackground => "service_bg",
            Slot::BlogCover { .. } => "blog_cover",
            Slot::SocialIcon { .. } => "social_icon",
        }
    }
}

impl SiteContent {
    /// Writes `url` into the slot.
    ///
    /// Returns `false` when the slot points at a blog post or social link
    /// that no longer exists; nothing is changed in that case.
    pub fn apply_asset(&mut self, slot: &Slot, url: String) -> bool {
        match slot {
            Slot::HeroImage => self.hero_settings.images.push(url),
            Slot::GalleryImage => self.hero_settings.gallery_images.push(url),
            Slot::Logo => self.hero_settings.logo = Some(url),
            Slot::FooterLogo => self.hero_settings.footer_logo = Some(url),
            Slot::WebsiteIcon => self.hero_settings.website_icon = url,
            Slot::AboutImage => self.about_settings.image = url,
            Slot::ServiceBackground => self.hero_settings.service_background_image = url,
            Slot::BlogCover { post_id } => {
                match self.blog_posts.iter_mut().find(|p| &p.id == post_id) {
                    Some(post) => post.cover_image = url,
                    None => return false,
                }
            }
            Slot::SocialIcon { index } => match self.contact_settings.socials.get_mut(*index) {
                Some(link) => link.icon = url,
                None => return false,
            },
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlogPost;

    #[test]
    fn aspect_ratios_per_slot() {
        assert_eq!(Slot::Logo.aspect_ratio(), AspectRatio::SQUARE);
        assert_eq!(Slot::SocialIcon { index: 0 }.aspect_ratio(), AspectRatio::SQUARE);
        assert_eq!(Slot::FooterLogo.aspect_ratio().to_string(), "3:1");
        assert_eq!(Slot::AboutImage.aspect_ratio().to_string(), "4:5");
        assert_eq!(Slot::GalleryImage.aspect_ratio().to_string(), "3:4");
        assert_eq!(Slot::HeroImage.aspect_ratio().to_string(), "16:9");
        assert_eq!(
            Slot::BlogCover { post_id: "1".into() }.aspect_ratio().to_string(),
            "16:10"
        );
    }

    #[test]
    fn list_slots_append_and_scalars_replace() {
        let mut content = SiteContent::default();
        assert!(content.apply_asset(&Slot::HeroImage, "a.jpg".into()));
        assert!(content.apply_asset(&Slot::HeroImage, "b.jpg".into()));
        assert!(content.apply_asset(&Slot::Logo, "logo.png".into()));
        assert!(content.apply_asset(&Slot::AboutImage, "about.jpg".into()));

        assert_eq!(content.hero_settings.images, vec!["a.jpg", "b.jpg"]);
        assert_eq!(content.hero_settings.logo.as_deref(), Some("logo.png"));
        assert_eq!(content.about_settings.image, "about.jpg");
    }

    #[test]
    fn keyed_slots_patch_one_element() {
        let mut content = SiteContent::default();
        content.blog_posts = vec![
            BlogPost { id: "1".into(), ..BlogPost::default() },
            BlogPost { id: "2".into(), ..BlogPost::default() },
        ];

        assert!(content.apply_asset(&Slot::BlogCover { post_id: "2".into() }, "c.jpg".into()));
        assert_eq!(content.blog_posts[0].cover_image, "");
        assert_eq!(content.blog_posts[1].cover_image, "c.jpg");

        assert!(content.apply_asset(&Slot::SocialIcon { index: 1 }, "fb.png".into()));
        assert_eq!(content.contact_settings.socials[1].icon, "fb.png");
        assert_eq!(content.contact_settings.socials[0].icon, "fi fi-brands-instagram");
    }

    #[test]
    fn missing_targets_are_no_ops() {
        let mut content = SiteContent::default();
        let before = content.clone();
        assert!(!content.apply_asset(&Slot::BlogCover { post_id: "nope".into() }, "x".into()));
        assert!(!content.apply_asset(&Slot::SocialIcon { index: 9 }, "x".into()));
        assert_eq!(content, before);
    }
}
