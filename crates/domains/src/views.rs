//! # Derived Views
//!
//! Groupings and filters recomputed from the flat lists on every read.
//! Nothing here is persisted.

use crate::models::{Branch, ContactMessage};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Group label for branches with an empty city.
pub const UNASSIGNED_CITY: &str = "Lainnya";

/// Branches grouped by city, groups in order of first appearance.
pub fn group_branches_by_city(branches: &[Branch]) -> Vec<(String, Vec<&Branch>)> {
    let mut groups: Vec<(String, Vec<&Branch>)> = Vec::new();
    for branch in branches {
        let city = if branch.city.is_empty() {
            UNASSIGNED_CITY
        } else {
            branch.city.as_str()
        };
        match groups.iter_mut().find(|(name, _)| name == city) {
            Some((_, members)) => members.push(branch),
            None => groups.push((city.to_string(), vec![branch])),
        }
    }
    groups
}

/// Sorted, de-duplicated cities for the "add branch" picker.
pub fn existing_cities(branches: &[Branch]) -> Vec<String> {
    branches
        .iter()
        .map(|b| b.city.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageFilter {
    #[default]
    All,
    Unread,
    Read,
}

impl MessageFilter {
    pub fn accepts(self, message: &ContactMessage) -> bool {
        match self {
            MessageFilter::All => true,
            MessageFilter::Unread => !message.is_read,
            MessageFilter::Read => message.is_read,
        }
    }
}

impl FromStr for MessageFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(MessageFilter::All),
            "unread" => Ok(MessageFilter::Unread),
            "read" => Ok(MessageFilter::Read),
            other => Err(format!("unknown message filter `{other}`")),
        }
    }
}

pub fn filter_messages(messages: &[ContactMessage], filter: MessageFilter) -> Vec<&ContactMessage> {
    messages.iter().filter(|m| filter.accepts(m)).collect()
}

pub fn unread_count(messages: &[ContactMessage]) -> usize {
    messages.iter().filter(|m| !m.is_read).count()
}
