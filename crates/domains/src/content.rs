//! # Site Content Aggregate
//!
//! [`SiteContent`] holds every editable slice of the site. It starts from
//! the defaults the site shipped with and is overwritten slice by slice when
//! a remote document arrives.
//!
//! The remote document carries the catalog and settings slices only; blog
//! posts live in their own table and messages are never part of the
//! document.

use crate::models::{
    AboutSettings, BlogPost, Branch, ContactMessage, ContactSettings, Course, Facility,
    HeroSettings, Job, Service, ServiceItem, SocialLink,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the single row holding the settings document.
pub const SITE_DOCUMENT_ID: i64 = 1;

/// The in-memory snapshot of all editable site content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    pub services: Vec<Service>,
    pub facilities: Vec<Facility>,
    pub branches: Vec<Branch>,
    pub jobs: Vec<Job>,
    pub courses: Vec<Course>,
    pub blog_posts: Vec<BlogPost>,
    pub messages: Vec<ContactMessage>,
    pub contact_settings: ContactSettings,
    pub hero_settings: HeroSettings,
    pub about_settings: AboutSettings,
}

/// Settings document as read from the remote store.
///
/// Every key is optional: a key that is absent (or `null`) leaves the
/// matching slice untouched when merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    pub services: Option<Vec<Service>>,
    pub facilities: Option<Vec<Facility>>,
    pub branches: Option<Vec<Branch>>,
    pub jobs: Option<Vec<Job>>,
    pub courses: Option<Vec<Course>>,
    pub contact_settings: Option<ContactSettings>,
    pub hero_settings: Option<HeroSettings>,
    pub about_settings: Option<AboutSettings>,
}

/// A document key that was present but did not fit its slice.
#[derive(Debug)]
pub struct RejectedKey {
    pub key: &'static str,
    pub error: serde_json::Error,
}

impl ContentDocument {
    /// Reads each top-level key on its own.
    ///
    /// A key whose value does not fit its slice is left out and reported;
    /// the other keys are still read. Fails only when `raw` is not an object.
    pub fn from_value_per_key(raw: Value) -> Result<(Self, Vec<RejectedKey>), serde_json::Error> {
        let mut map: Map<String, Value> = serde_json::from_value(raw)?;
        let mut rejected = Vec::new();
        let doc = ContentDocument {
            services: take(&mut map, "services", &mut rejected),
            facilities: take(&mut map, "facilities", &mut rejected),
            branches: take(&mut map, "branches", &mut rejected),
            jobs: take(&mut map, "jobs", &mut rejected),
            courses: take(&mut map, "courses", &mut rejected),
            contact_settings: take(&mut map, "contactSettings", &mut rejected),
            hero_settings: take(&mut map, "heroSettings", &mut rejected),
            about_settings: take(&mut map, "aboutSettings", &mut rejected),
        };
        Ok((doc, rejected))
    }
}

fn take<T: DeserializeOwned>(
    map: &mut Map<String, Value>,
    key: &'static str,
    rejected: &mut Vec<RejectedKey>,
) -> Option<T> {
    match map.remove(key)? {
        Value::Null => None,
        value => match serde_json::from_value(value) {
            Ok(slice) => Some(slice),
            Err(error) => {
                rejected.push(RejectedKey { key, error });
                None
            }
        },
    }
}

/// Borrowed view of the slices that make up the published document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocumentRef<'a> {
    pub services: &'a [Service],
    pub facilities: &'a [Facility],
    pub branches: &'a [Branch],
    pub jobs: &'a [Job],
    pub courses: &'a [Course],
    pub contact_settings: &'a ContactSettings,
    pub hero_settings: &'a HeroSettings,
    pub about_settings: &'a AboutSettings,
}

impl SiteContent {
    /// Serializable view of everything that goes into the settings document.
    pub fn document(&self) -> ContentDocumentRef<'_> {
        ContentDocumentRef {
            services: &self.services,
            facilities: &self.facilities,
            branches: &self.branches,
            jobs: &self.jobs,
            courses: &self.courses,
            contact_settings: &self.contact_settings,
            hero_settings: &self.hero_settings,
            about_settings: &self.about_settings,
        }
    }

    /// Shallow merge at top-level key granularity.
    ///
    /// Returns the keys that were applied, in document order.
    pub fn merge_document(&mut self, doc: ContentDocument) -> Vec<&'static str> {
        let mut applied = Vec::new();
        if let Some(services) = doc.services {
            self.services = services;
            applied.push("services");
        }
        if let Some(facilities) = doc.facilities {
            self.facilities = facilities;
            applied.push("facilities");
        }
        if let Some(branches) = doc.branches {
            self.branches = branches;
            applied.push("branches");
        }
        if let Some(jobs) = doc.jobs {
            self.jobs = jobs;
            applied.push("jobs");
        }
        if let Some(courses) = doc.courses {
            self.courses = courses;
            applied.push("courses");
        }
        if let Some(contact) = doc.contact_settings {
            self.contact_settings = contact;
            applied.push("contactSettings");
        }
        if let Some(hero) = doc.hero_settings {
            self.hero_settings = hero;
            applied.push("heroSettings");
        }
        if let Some(about) = doc.about_settings {
            self.about_settings = about;
            applied.push("aboutSettings");
        }
        applied
    }
}

impl Default for SiteContent {
    /// The content the site ships with before any remote document is read.
    fn default() -> Self {
        Self {
            services: vec![
                Service {
                    id: 1,
                    title: "Signature Haircut".into(),
                    icon: "Scissors".into(),
                    items: vec![
                        item(
                            "Executive Haircut",
                            "Potongan rambut premium dengan cuci rambut, pijat kepala, dan styling.",
                        ),
                        item("Classic Cut", "Gaya klasik timeless dengan sentuhan modern."),
                    ],
                },
                Service {
                    id: 2,
                    title: "Beard & Grooming".into(),
                    icon: "Zap".into(),
                    items: vec![
                        item("Traditional Shave", "Cukur tradisional menggunakan handuk hangat."),
                        item("Beard Trimming", "Perapihan jenggot sesuai bentuk wajah."),
                    ],
                },
            ],
            facilities: vec![
                facility(1, "Premium Lounge", "Coffee"),
                facility(2, "High-Speed WiFi", "Wifi"),
                facility(3, "Air Conditioned", "Thermometer"),
                facility(4, "Free Soft Drink", "Droplets"),
            ],
            branches: vec![Branch {
                id: "1".into(),
                city: "Sukabumi".into(),
                name: "Pixel Pusat".into(),
                address: "Jl. Ahmad Yani No. 125".into(),
                hours: "10:00 - 21:00".into(),
                map_url: String::new(),
                image: String::new(),
                phone: None,
                whatsapp: Some("08123456789".into()),
            }],
            jobs: vec![Job {
                id: 1,
                title: "Senior Barber".into(),
                kind: "Full-Time".into(),
                requirements: vec![
                    "Pengalaman min 2 tahun".into(),
                    "Mahir berbagai gaya rambut".into(),
                    "Komunikatif".into(),
                ],
                ..Job::default()
            }],
            courses: vec![Course {
                id: 1,
                title: "Basic Barbering".into(),
                duration: "12 Sesi".into(),
                level: "Beginner".into(),
                description: "Belajar teknik dasar memotong rambut dari nol.".into(),
                price: "Rp 3.500.000".into(),
                ..Course::default()
            }],
            blog_posts: Vec::new(),
            messages: Vec::new(),
            contact_settings: ContactSettings {
                address: "Jl. Jend. Ahmad Yani No. 125, Sukabumi, Jawa Barat".into(),
                phone: "0812-3456-7890".into(),
                email: "hello@pixelbarbershop.com".into(),
                map_embed_url: "https://www.google.com/maps/embed?pb=!1m18!1m12!1m3!1d3960.678486018318!2d106.9248731!3d-6.9290076!2m3!1f0!2f0!3f0!3m2!1i1024!2i768!4f13.1!3m3!1m2!1s0x2e684824578b668d%3A0x77c68837e403d15!2sSukabumi%2C%20West%20Java!5e0!3m2!1sen!2sid!4v1710000000000!5m2!1sen!2sid".into(),
                booking_url: "https://wa.me/6281234567890".into(),
                socials: vec![
                    SocialLink {
                        platform: "Instagram".into(),
                        url: "https://instagram.com/pixelbarber".into(),
                        icon: "fi fi-brands-instagram".into(),
                    },
                    SocialLink {
                        platform: "Facebook".into(),
                        url: "https://facebook.com/pixelbarber".into(),
                        icon: "fi fi-brands-facebook".into(),
                    },
                ],
            },
            hero_settings: HeroSettings {
                cta_text: "Booking Sekarang".into(),
                logo: Some(String::new()),
                footer_logo: Some(String::new()),
                ..HeroSettings::default()
            },
            about_settings: AboutSettings {
                subtitle: "Kisah Kami".into(),
                title: "Presisi di Setiap Potongan".into(),
                description1: "Berdiri sejak 2020, Pixel Barbershop berdedikasi untuk memberikan pengalaman grooming yang tak terlupakan bagi setiap pria.".into(),
                description2: "Kami percaya bahwa rambut adalah mahkota pria, dan setiap detail kecil sangatlah berharga.".into(),
                image: String::new(),
                stats_value: "5,000+".into(),
                stats_label: "Pelanggan Puas".into(),
            },
        }
    }
}

fn item(name: &str, description: &str) -> ServiceItem {
    ServiceItem {
        name: name.into(),
        icon: "Check".into(),
        description: Some(description.into()),
    }
}

fn facility(id: i64, name: &str, icon: &str) -> Facility {
    Facility {
        id,
        name: name.into(),
        icon: icon.into(),
    }
}
