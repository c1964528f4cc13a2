//! Per-group sibling listings.
//!
//! Each directory group keeps the headers of its kept pages in order, so
//! any page can enumerate its siblings (`site.posts`).
//!
//! # Ordering
//!
//! Headers without `order` are appended in scan order. A header with
//! `order = n` is inserted right after the last entry whose order is `<= n`,
//! found by scanning backwards; an entry without `order` also stops the scan.
//! Equal orders therefore keep their scan order.
//!
//! ```text
//! scan:    a(2) b(1) c(2) d(-)
//! listing: b(1) a(2) c(2) d(-)
//! ```

use crate::compiler::meta::Header;
use std::collections::BTreeMap;

/// Ordered header lists, one per directory group.
#[derive(Debug, Clone, Default)]
pub struct Listings {
    groups: BTreeMap<String, Vec<Header>>,
}

impl Listings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group so it shows up (possibly empty) in site data.
    pub fn ensure_group(&mut self, group: &str) {
        self.groups.entry(group.to_owned()).or_default();
    }

    /// Insert a header into a group's listing at its ordered position.
    pub fn insert(&mut self, group: &str, header: Header) {
        let list = self.groups.entry(group.to_owned()).or_default();
        let Some(order) = header.order else {
            list.push(header);
            return;
        };

        let pos = list
            .iter()
            .rposition(|h| h.order.is_none_or(|o| o <= order))
            .map_or(0, |i| i + 1);
        list.insert(pos, header);
    }

    /// All groups, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Header])> {
        self.groups
            .iter()
            .map(|(name, list)| (name.as_str(), list.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }
}
