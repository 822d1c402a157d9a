//! Dashboard-style edits on the local aggregate.
//!
//! Everything here is in-memory only, like the slice setters. New entities
//! are prepended and take their id from the store's [`IdClock`](crate::IdClock).

use crate::store::ContentStore;
use chrono::Utc;
use domains::edit::remove_at;
use domains::icons::Icon;
use domains::{
    BlogPost, Branch, Course, DomainError, Facility, ImageList, Job, Service, ServiceItem, SocialLink,
};

pub const NEW_POST_AUTHOR: &str = "Pixel Team";

/// Catalog entries that carry an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconTarget {
    Service(i64),
    Facility(i64),
    Job(i64),
    Course(i64),
}

impl ContentStore {
    pub fn add_service(&mut self) -> i64 {
        let id = self.ids.next();
        self.content.services.insert(
            0,
            Service {
                id,
                title: "Kategori Baru".into(),
                icon: "Scissors".into(),
                items: Vec::new(),
            },
        );
        id
    }

    /// Appends a line to a service category. Returns false if the category is gone.
    pub fn add_service_item(&mut self, service_id: i64, item: ServiceItem) -> bool {
        match self.content.services.iter_mut().find(|s| s.id == service_id) {
            Some(service) => {
                service.items.push(item);
                true
            }
            None => false,
        }
    }

    pub fn add_facility(&mut self) -> i64 {
        let id = self.ids.next();
        self.content.facilities.insert(
            0,
            Facility {
                id,
                name: "Fasilitas Baru".into(),
                icon: "Coffee".into(),
            },
        );
        id
    }

    pub fn add_job(&mut self) -> i64 {
        let id = self.ids.next();
        self.content.jobs.insert(
            0,
            Job {
                id,
                title: "Posisi Baru".into(),
                kind: "Full-Time".into(),
                requirements: vec!["Syarat 1".into()],
                benefits: Some(Vec::new()),
                custom_link: Some(String::new()),
                icon: Some("Briefcase".into()),
                ..Job::default()
            },
        );
        id
    }

    pub fn add_course(&mut self) -> i64 {
        let id = self.ids.next();
        self.content.courses.insert(
            0,
            Course {
                id,
                title: "Kelas Baru".into(),
                duration: "12 Sesi".into(),
                level: "Beginner".into(),
                description: "Deskripsi...".into(),
                price: "Rp 3.500.000".into(),
                custom_link: Some(String::new()),
                icon: Some("BookOpen".into()),
            },
        );
        id
    }

    /// New draft article dated today, with slug `artikel-{id}`.
    pub fn add_blog_post(&mut self) -> String {
        let id = self.ids.next_string();
        self.content.blog_posts.insert(
            0,
            BlogPost {
                id: id.clone(),
                title: "Judul Baru".into(),
                slug: format!("artikel-{id}"),
                author: NEW_POST_AUTHOR.into(),
                date: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
                ..BlogPost::default()
            },
        );
        id
    }

    /// Opens a branch in `city`, which may be an existing or a new city.
    pub fn add_branch(&mut self, city: &str) -> domains::Result<String> {
        let city = city.trim();
        if city.is_empty() {
            return Err(DomainError::Validation("choose or enter a city first".into()));
        }
        let id = self.ids.next_string();
        self.content.branches.insert(
            0,
            Branch {
                id: id.clone(),
                city: city.to_string(),
                name: "Pixel Cabang Baru".into(),
                address: "Alamat belum ditentukan".into(),
                hours: "10:00 - 21:00".into(),
                whatsapp: Some(String::new()),
                ..Branch::default()
            },
        );
        Ok(id)
    }

    pub fn remove_service(&mut self, id: i64) -> bool {
        retain_removed(&mut self.content.services, |s| s.id != id)
    }

    pub fn remove_service_item(&mut self, service_id: i64, index: usize) -> Option<ServiceItem> {
        let service = self.content.services.iter_mut().find(|s| s.id == service_id)?;
        remove_at(&mut service.items, index)
    }

    pub fn remove_facility(&mut self, id: i64) -> bool {
        retain_removed(&mut self.content.facilities, |f| f.id != id)
    }

    pub fn remove_branch(&mut self, id: &str) -> bool {
        retain_removed(&mut self.content.branches, |b| b.id != id)
    }

    pub fn remove_job(&mut self, id: i64) -> bool {
        retain_removed(&mut self.content.jobs, |j| j.id != id)
    }

    pub fn remove_course(&mut self, id: i64) -> bool {
        retain_removed(&mut self.content.courses, |c| c.id != id)
    }

    /// Removes the post locally; the remote row stays until overwritten.
    pub fn remove_blog_post(&mut self, id: &str) -> bool {
        retain_removed(&mut self.content.blog_posts, |p| p.id != id)
    }

    pub fn remove_social(&mut self, index: usize) -> Option<SocialLink> {
        remove_at(&mut self.content.contact_settings.socials, index)
    }

    /// Stores the picked icon on a catalog entry. False if the entry is gone.
    pub fn apply_icon(&mut self, target: IconTarget, icon: &Icon) -> bool {
        let stored = icon.to_stored();
        let content = &mut self.content;
        match target {
            IconTarget::Service(id) => content.services.iter_mut().find(|s| s.id == id).map(|s| s.icon = stored),
            IconTarget::Facility(id) => content.facilities.iter_mut().find(|f| f.id == id).map(|f| f.icon = stored),
            IconTarget::Job(id) => content.jobs.iter_mut().find(|j| j.id == id).map(|j| j.icon = Some(stored)),
            IconTarget::Course(id) => content.courses.iter_mut().find(|c| c.id == id).map(|c| c.icon = Some(stored)),
        }
        .is_some()
    }

    /// Drag-and-drop reorder of the hero or gallery list.
    pub fn move_image(&mut self, list: ImageList, from: usize, to: usize) -> bool {
        self.content.hero_settings.move_image(list, from, to)
    }

    pub fn remove_image(&mut self, list: ImageList, index: usize) -> Option<String> {
        self.content.hero_settings.remove_image(list, index)
    }
}

fn retain_removed<T>(items: &mut Vec<T>, keep: impl FnMut(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(keep);
    items.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::icons::IconName;

    #[test]
    fn new_entities_are_prepended_with_fresh_ids() {
        let mut store = ContentStore::new(None);
        let first = store.add_facility();
        let second = store.add_facility();
        assert!(second > first);
        assert_eq!(store.facilities()[0].id, second);
        assert_eq!(store.facilities()[1].id, first);
        assert_eq!(store.facilities()[0].name, "Fasilitas Baru");
    }

    #[test]
    fn new_blog_post_defaults() {
        let mut store = ContentStore::new(None);
        let id = store.add_blog_post();
        let post = &store.blog_posts()[0];
        assert_eq!(post.id, id);
        assert_eq!(post.slug, format!("artikel-{id}"));
        assert_eq!(post.author, NEW_POST_AUTHOR);
        assert_eq!(post.date.len(), 10);
        assert!(post.created_at.is_none());
    }

    #[test]
    fn branches_need_a_city() {
        let mut store = ContentStore::new(None);
        assert!(matches!(store.add_branch("   "), Err(DomainError::Validation(_))));
        let id = store.add_branch("  Bogor ").unwrap();
        assert_eq!(store.branches()[0].id, id);
        assert_eq!(store.branches()[0].city, "Bogor");
        assert!(store.remove_branch(&id));
        assert!(!store.remove_branch(&id));
    }

    #[test]
    fn removal_by_id() {
        let mut store = ContentStore::new(None);
        assert!(store.remove_service(1));
        assert_eq!(store.services().len(), 1);
        assert!(!store.remove_job(99));
        assert_eq!(store.remove_service_item(2, 0).unwrap().name, "Traditional Shave");
        assert!(store.remove_service_item(1, 0).is_none());
        assert_eq!(store.remove_social(1).unwrap().platform, "Facebook");
        assert!(store.remove_social(5).is_none());
    }

    #[test]
    fn icons_are_applied_by_target() {
        let mut store = ContentStore::new(None);
        assert!(store.apply_icon(IconTarget::Service(2), &Icon::Named(IconName::Star)));
        assert_eq!(store.services()[1].icon, "Star");

        let svg = Icon::resolve("<svg viewBox=\"0 0 1 1\"></svg>");
        assert!(store.apply_icon(IconTarget::Job(1), &svg));
        assert_eq!(store.jobs()[0].icon.as_deref(), Some("<svg viewBox=\"0 0 1 1\"></svg>"));

        assert!(!store.apply_icon(IconTarget::Course(42), &Icon::Named(IconName::Award)));
    }

    #[test]
    fn hero_images_reorder_and_remove() {
        let mut store = ContentStore::new(None);
        store.edit(|c| c.hero_settings.images = vec!["a".into(), "b".into(), "c".into()]);
        assert!(store.move_image(ImageList::Hero, 0, 2));
        assert_eq!(store.hero_settings().images, ["b", "c", "a"]);
        assert!(!store.move_image(ImageList::Hero, 1, 1));
        assert_eq!(store.remove_image(ImageList::Hero, 0).as_deref(), Some("b"));
        assert!(store.remove_image(ImageList::Gallery, 0).is_none());
    }
}
