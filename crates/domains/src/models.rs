//! # Domain Models
//!
//! These structs represent the records held in the site content aggregate.
//! Catalog and settings records travel inside the remote settings document
//! and use camelCase keys there; blog posts and contact messages are table
//! rows and keep their snake_case column names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// One line of a service category (e.g. "Executive Haircut").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceItem {
    pub name: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A catalog category shown on the services page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    pub id: i64,
    pub title: String,
    pub icon: String,
    pub items: Vec<ServiceItem>,
}

/// Amenity badge (lounge, wifi, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Facility {
    pub id: i64,
    pub name: String,
    pub icon: String,
}

/// A shop location. `city` is free text; grouping is derived, not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Branch {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub city: String,
    pub name: String,
    pub address: String,
    pub hours: String,
    pub map_url: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
}

/// Open position listed on the careers page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub title: String,
    /// Employment type, e.g. "Full-Time"
    #[serde(rename = "type")]
    pub kind: String,
    pub requirements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefits: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Academy class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub duration: String,
    pub level: String,
    pub description: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A blog article as read from the blog table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogPost {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,
    /// Raw markup-bearing body
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub excerpt: String,
    #[serde(deserialize_with = "null_as_default")]
    pub author: String,
    /// Publication date as entered by the admin (`YYYY-MM-DD`)
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cover_image: String,
    /// Populated by the server; never written back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Outgoing blog row. Same columns as [`BlogPost`] minus `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogPostRecord {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub date: String,
    pub cover_image: String,
}

impl From<&BlogPost> for BlogPostRecord {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone(),
            author: post.author.clone(),
            date: post.date.clone(),
            cover_image: post.cover_image.clone(),
        }
    }
}

/// Primary key of a contact message. The messages table hands back integers,
/// but ids can also arrive as text from callers.
///
/// Ordering puts integers before text and compares within each kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageId {
    Int(i64),
    Text(String),
}

impl MessageId {
    /// Numeric-looking text ids become integers.
    pub fn normalized(&self) -> MessageId {
        match self {
            MessageId::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(MessageId::Int)
                .unwrap_or_else(|_| MessageId::Text(s.clone())),
            MessageId::Int(n) => MessageId::Int(*n),
        }
    }

    /// Equality after normalization, so `"7"` matches `7`.
    pub fn matches(&self, other: &MessageId) -> bool {
        self.normalized() == other.normalized()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Int(n) => write!(f, "{n}"),
            MessageId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for MessageId {
    fn from(value: i64) -> Self {
        MessageId::Int(value)
    }
}

impl FromStr for MessageId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MessageId::Text(s.to_string()).normalized())
    }
}

/// Inbound contact-form submission.
///
/// Optional form fields come back as `null` from the table; they read as
/// empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: MessageId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// What a public visitor fills in on the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// Row inserted into the messages table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageInsert {
    #[serde(flatten)]
    pub draft: MessageDraft,
    pub is_read: bool,
}

impl MessageDraft {
    /// New submissions always start unread.
    pub fn into_insert(self) -> MessageInsert {
        MessageInsert {
            draft: self,
            is_read: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    /// Icon class, uploaded image URL or raw `<svg>` markup
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactSettings {
    pub address: String,
    pub phone: String,
    pub email: String,
    pub map_embed_url: String,
    pub booking_url: String,
    pub socials: Vec<SocialLink>,
}

/// Copy and imagery for the top-of-page hero section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroSettings {
    pub subtitle: String,
    pub title_part1: String,
    pub title_part2: String,
    pub description: String,
    /// Slideshow, in display order
    pub images: Vec<String>,
    pub gallery_images: Vec<String>,
    pub cta_text: String,
    /// Favicon URL
    pub website_icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_logo: Option<String>,
    pub service_background_image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AboutSettings {
    pub subtitle: String,
    pub title: String,
    pub description1: String,
    pub description2: String,
    pub image: String,
    pub stats_value: String,
    pub stats_label: String,
}

/// Table columns may be `null`; those read as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts both `"17"` and `17` for id columns that are text on our side.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(f) => f.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_ids_normalize_numeric_text() {
        assert_eq!("42".parse::<MessageId>().unwrap(), MessageId::Int(42));
        assert_eq!(
            "abc-1".parse::<MessageId>().unwrap(),
            MessageId::Text("abc-1".into())
        );
        assert!(MessageId::Text("7".into()).matches(&MessageId::Int(7)));
        assert!(!MessageId::Int(7).matches(&MessageId::Int(8)));
    }

    #[test]
    fn branch_uses_camel_case_and_accepts_numeric_ids() {
        let branch: Branch = serde_json::from_value(json!({
            "id": 12,
            "city": "Bogor",
            "name": "Pixel Bogor",
            "mapUrl": "https://maps.example/bogor"
        }))
        .unwrap();
        assert_eq!(branch.id, "12");
        assert_eq!(branch.map_url, "https://maps.example/bogor");
        assert_eq!(branch.hours, "");

        let value = serde_json::to_value(&branch).unwrap();
        assert_eq!(value["mapUrl"], "https://maps.example/bogor");
        assert!(value.get("whatsapp").is_none());
    }

    #[test]
    fn job_kind_maps_to_type_key() {
        let job: Job = serde_json::from_value(json!({
            "id": 3, "title": "Barber", "type": "Part-Time", "requirements": ["Sabar"]
        }))
        .unwrap();
        assert_eq!(job.kind, "Part-Time");
        assert_eq!(serde_json::to_value(&job).unwrap()["type"], "Part-Time");
    }

    #[test]
    fn blog_record_drops_server_timestamp() {
        let post: BlogPost = serde_json::from_value(json!({
            "id": 1700000000000i64,
            "title": "Tips",
            "slug": "tips",
            "date": "2024-05-01",
            "created_at": "2024-05-01T10:00:00+00:00"
        }))
        .unwrap();
        assert_eq!(post.id, "1700000000000");
        assert!(post.created_at.is_some());

        let row = serde_json::to_value(BlogPostRecord::from(&post)).unwrap();
        assert_eq!(row["id"], "1700000000000");
        assert!(row.get("created_at").is_none());
    }

    #[test]
    fn message_rows_with_null_columns_still_load() {
        let message: ContactMessage = serde_json::from_value(json!({
            "id": 4,
            "name": "Budi",
            "email": "budi@example.com",
            "phone": null,
            "message": "Buka hari Minggu?",
            "is_read": null,
            "created_at": "2024-05-01T10:00:00+00:00"
        }))
        .unwrap();
        assert_eq!(message.id, MessageId::Int(4));
        assert_eq!(message.phone, "");
        assert!(!message.is_read);
    }

    #[test]
    fn blog_rows_with_null_columns_still_load() {
        let post: BlogPost = serde_json::from_value(json!({
            "id": "9", "title": "Pomade", "excerpt": null, "cover_image": null
        }))
        .unwrap();
        assert_eq!(post.title, "Pomade");
        assert_eq!(post.excerpt, "");
        assert_eq!(post.cover_image, "");
    }

    #[test]
    fn message_ids_order_numerically() {
        let mut ids = vec![MessageId::Int(10), MessageId::Text("b".into()), MessageId::Int(9)];
        ids.sort();
        assert_eq!(ids, vec![MessageId::Int(9), MessageId::Int(10), MessageId::Text("b".into())]);
    }

    #[test]
    fn drafts_insert_unread() {
        let insert = MessageDraft {
            name: "Budi".into(),
            email: "budi@example.com".into(),
            phone: "0812".into(),
            message: "Halo".into(),
        }
        .into_insert();
        let row = serde_json::to_value(&insert).unwrap();
        assert_eq!(row["is_read"], false);
        assert_eq!(row["name"], "Budi");
    }
}
