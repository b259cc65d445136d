//! The ordered, de-duplicated saved-item collection.

use crate::{error::Result, CollectionItem, Error, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An ordered sequence of saved items.
///
/// Invariant: no two items share a `product_id`. Every mutating method
/// enforces it; there is no way to insert a duplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    items: Vec<CollectionItem>,
}

impl Collection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a collection from untrusted items, dropping later duplicates.
    ///
    /// Returns the collection and the number of items dropped.
    pub fn repair(items: Vec<CollectionItem>) -> (Self, usize) {
        let mut seen = HashSet::with_capacity(items.len());
        let total = items.len();
        let items: Vec<_> = items
            .into_iter()
            .filter(|item| seen.insert(item.product_id.clone()))
            .collect();
        let dropped = total - items.len();
        (Self { items }, dropped)
    }

    /// Get an item by local handle.
    pub fn get(&self, id: &str) -> Option<&CollectionItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Get a mutable item by local handle.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut CollectionItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Get an item by product.
    pub fn find_product(&self, product_id: &str) -> Option<&CollectionItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Check whether a product is saved.
    pub fn contains_product(&self, product_id: &str) -> bool {
        self.find_product(product_id).is_some()
    }

    /// Append an item.
    pub fn insert(&mut self, item: CollectionItem) -> Result<()> {
        let index = self.items.len();
        self.insert_at(index, item)
    }

    /// Insert an item at `index` (clamped to the end).
    pub fn insert_at(&mut self, index: usize, item: CollectionItem) -> Result<()> {
        if self.contains_product(&item.product_id) {
            return Err(Error::AlreadyExists(item.product_id));
        }
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        Ok(())
    }

    /// Remove an item by local handle, returning its former position.
    pub fn remove(&mut self, id: &str) -> Option<(usize, CollectionItem)> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some((index, self.items.remove(index)))
    }

    /// Remove every item, returning them in order.
    pub fn drain(&mut self) -> Vec<CollectionItem> {
        std::mem::take(&mut self.items)
    }

    /// Keep only the items matching the predicate. Returns how many were dropped.
    pub fn retain<F>(&mut self, predicate: F) -> usize
    where
        F: FnMut(&CollectionItem) -> bool,
    {
        let before = self.items.len();
        self.items.retain(predicate);
        before - self.items.len()
    }

    /// All items in insertion order.
    pub fn items(&self) -> &[CollectionItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollectionItem> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<CollectionItem> {
        self.items
    }

    /// Handles of items the server has not confirmed.
    pub fn unsynced(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|item| item.pending_push)
            .map(|item| item.id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
