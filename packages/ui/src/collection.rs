//! # Paginated collection: ordered, de-duplicated, with a server total
//!
//! [`PaginatedCollection`] is the storage behind every infinite-scroll list.
//! Items keep the order in which their identifier was first seen: the first
//! page in server order, then each appended page after it.
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`replace`](PaginatedCollection::replace) | Discard everything and take the page as-is (scope switch, refresh). |
//! | [`merge`](PaginatedCollection::merge) | Append new identifiers; overwrite known ones in place. |
//! | [`prepend`](PaginatedCollection::prepend) / [`push`](PaginatedCollection::push) | Insert a freshly created item and count it in the total. |
//! | [`set`](PaginatedCollection::set) / [`update_item`](PaginatedCollection::update_item) | Swap or edit one item without moving it. |
//! | [`remove`](PaginatedCollection::remove) | Drop an item and uncount it. |
//!
//! Invariants: identifiers are unique, and `len() <= total()` at all times.
//! The total is taken from the server verbatim unless the server reports fewer
//! items than are already held, in which case it is raised to `len()`.

use std::collections::HashMap;

use api::{Identified, Page};

#[derive(Debug, Clone)]
pub struct PaginatedCollection<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
    total: u64,
}

impl<T> Default for PaginatedCollection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            total: 0,
        }
    }
}

impl<T: Identified> PaginatedCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// More items exist on the server than are loaded.
    pub fn has_more(&self) -> bool {
        (self.items.len() as u64) < self.total
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
        self.total = 0;
    }

    /// Replace the whole collection with `page`.
    pub fn replace(&mut self, page: Page<T>) {
        self.items.clear();
        self.index.clear();
        self.merge(page);
    }

    /// Merge `page` by identifier and store its total.
    pub fn merge(&mut self, page: Page<T>) {
        for item in page.items {
            self.upsert(item);
        }
        self.set_total(page.total);
    }

    /// Insert at the front, e.g. a post the user just created. A known
    /// identifier is overwritten in place instead.
    pub fn prepend(&mut self, item: T) {
        if let Some(&i) = self.index.get(item.id()) {
            self.items[i] = item;
            return;
        }
        self.items.insert(0, item);
        self.reindex();
        self.total += 1;
    }

    /// Insert at the end, e.g. a comment the user just added.
    pub fn push(&mut self, item: T) {
        if !self.contains(item.id()) {
            self.total += 1;
        }
        self.upsert(item);
        self.ensure_total_covers_len();
    }

    /// Overwrite the item with `id` with `item`, keeping its position.
    /// Returns `false` when `id` is not loaded.
    pub fn set(&mut self, id: &str, item: T) -> bool {
        match self.index.get(id) {
            Some(&i) => {
                self.items[i] = item;
                true
            }
            None => false,
        }
    }

    /// Edit the item with `id` in place; returns the closure's result.
    pub fn update_item<R>(&mut self, id: &str, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let &i = self.index.get(id)?;
        Some(f(&mut self.items[i]))
    }

    /// Remove the item with `id`. Returns it if it was loaded.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let i = self.index.remove(id)?;
        let removed = self.items.remove(i);
        self.reindex();
        self.total = self.total.saturating_sub(1);
        Some(removed)
    }

    fn upsert(&mut self, item: T) {
        match self.index.get(item.id()) {
            Some(&i) => self.items[i] = item,
            None => {
                self.index.insert(item.id().to_string(), self.items.len());
                self.items.push(item);
            }
        }
    }

    fn set_total(&mut self, reported: u64) {
        self.total = reported;
        self.ensure_total_covers_len();
    }

    fn ensure_total_covers_len(&mut self) {
        let len = self.items.len() as u64;
        if self.total < len {
            tracing::debug!("Server total {} below loaded count {}, raising", self.total, len);
            self.total = len;
        }
    }

    fn reindex(&mut self) {
        self.index = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id().to_string(), i))
            .collect();
    }
}
