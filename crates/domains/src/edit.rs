//! # List Editing
//!
//! Array-splice helpers behind the dashboard's drag-and-drop reordering and
//! delete buttons.

use crate::models::HeroSettings;
use crate::slot::ImageList;

/// Removes the element at `from` and reinserts it at `to`.
///
/// Out-of-range indices and `from == to` leave the list untouched and
/// return `false`.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Removes the element at `index`, if any.
pub fn remove_at<T>(items: &mut Vec<T>, index: usize) -> Option<T> {
    (index < items.len()).then(|| items.remove(index))
}

impl HeroSettings {
    pub fn image_list(&self, list: ImageList) -> &Vec<String> {
        match list {
            ImageList::Hero => &self.images,
            ImageList::Gallery => &self.gallery_images,
        }
    }

    pub fn image_list_mut(&mut self, list: ImageList) -> &mut Vec<String> {
        match list {
            ImageList::Hero => &mut self.images,
            ImageList::Gallery => &mut self.gallery_images,
        }
    }

    pub fn move_image(&mut self, list: ImageList, from: usize, to: usize) -> bool {
        move_item(self.image_list_mut(list), from, to)
    }

    pub fn remove_image(&mut self, list: ImageList, index: usize) -> Option<String> {
        remove_at(self.image_list_mut(list), index)
    }
}
