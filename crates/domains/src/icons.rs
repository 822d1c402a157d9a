//! # Icon Lookup
//!
//! Catalog entries store their icon as a plain string. It is either the name
//! of one of the supported glyphs or raw `<svg>` markup pasted by the admin.
//! Social links additionally accept uploaded image URLs and icon-font classes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! icon_names {
    ($($variant:ident),+ $(,)?) => {
        /// Glyphs the site knows how to draw.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum IconName {
            $($variant),+
        }

        impl IconName {
            /// Every supported glyph, in picker order.
            pub const ALL: &'static [IconName] = &[$(IconName::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(IconName::$variant => stringify!($variant)),+
                }
            }
        }

        impl FromStr for IconName {
            type Err = UnknownIcon;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok(IconName::$variant),)+
                    other => Err(UnknownIcon(other.to_string())),
                }
            }
        }
    };
}

icon_names!(
    Scissors, Zap, Sparkles, Star, Palette, User, Droplets, Smile, CloudRain, Circle, UserCheck,
    Coffee, Layers, ArrowDown, ArrowUp, Wind, AlignJustify, Heart, Feather, Moon, Sun, RefreshCw,
    Wifi, Thermometer, Shield, Home, MapIcon, Briefcase, BookOpen, Award, TrendingUp,
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIcon(pub String);

impl fmt::Display for UnknownIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown icon `{}`", self.0)
    }
}

impl std::error::Error for UnknownIcon {}

impl fmt::Display for IconName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog icon after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Icon {
    Named(IconName),
    /// Raw `<svg>` markup, rendered as-is
    Markup(String),
}

impl Icon {
    /// Unknown names fall back to the scissors glyph.
    pub const FALLBACK: IconName = IconName::Scissors;

    pub fn resolve(raw: &str) -> Icon {
        let trimmed = raw.trim();
        if trimmed.starts_with("<svg") {
            return Icon::Markup(trimmed.to_string());
        }
        Icon::Named(trimmed.parse().unwrap_or(Self::FALLBACK))
    }

    /// The string stored back into content.
    pub fn to_stored(&self) -> String {
        match self {
            Icon::Named(name) => name.as_str().to_string(),
            Icon::Markup(svg) => svg.clone(),
        }
    }
}

/// Brand glyphs used when a social link has no usable icon value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brand {
    Instagram,
    Facebook,
    Youtube,
}

/// How a social link icon is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocialIcon {
    Markup(String),
    /// Uploaded image or data URL
    Image(String),
    /// Icon-font class list, e.g. `fi fi-brands-instagram`
    Class(String),
    Brand(Brand),
}

impl SocialIcon {
    pub fn resolve(platform: &str, raw: &str) -> SocialIcon {
        let trimmed = raw.trim();
        if trimmed.starts_with("<svg") {
            return SocialIcon::Markup(trimmed.to_string());
        }
        if trimmed.starts_with("http") || trimmed.starts_with("data:image") {
            return SocialIcon::Image(trimmed.to_string());
        }
        if trimmed.starts_with("fi") {
            return SocialIcon::Class(trimmed.to_string());
        }

        let platform = platform.to_lowercase();
        let brand = if platform.contains("facebook") {
            Brand::Facebook
        } else if platform.contains("youtube") {
            Brand::Youtube
        } else {
            Brand::Instagram
        };
        SocialIcon::Brand(brand)
    }
}
