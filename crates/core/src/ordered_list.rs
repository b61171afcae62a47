//! Ordered-list editing model.
//!
//! Admin screens edit short ordered sequences (FAQ entries, gallery spaces,
//! testimonials) by appending, editing, removing and moving items. Each item
//! is tagged with a stable [`ItemId`] so the expanded item keeps its identity
//! across removals and moves; its index is derived on demand.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Stable identifier of an item inside one [`OrderedList`].
pub type ItemId = u64;

/// An ordered sequence of records with an optional expanded item.
#[derive(Debug, Clone)]
pub struct OrderedList<T> {
    items: Vec<(ItemId, T)>,
    next_id: ItemId,
    expanded: Option<ItemId>,
}

impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_id: 0,
            expanded: None,
        }
    }
}

impl<T> OrderedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from persisted records, nothing expanded.
    pub fn from_items(items: Vec<T>) -> Self {
        let mut list = Self::new();
        for item in items {
            list.insert_tagged(item);
        }
        list
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index).map(|(_, item)| item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|(_, item)| item)
    }

    /// Stable id of the item currently at `index`.
    pub fn id_at(&self, index: usize) -> Option<ItemId> {
        self.items.get(index).map(|(id, _)| *id)
    }

    /// Current index of the item with the given id.
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|(item_id, _)| *item_id == id)
    }

    /// Append an item and expand it for editing.
    pub fn push(&mut self, item: T) -> ItemId {
        let id = self.insert_tagged(item);
        self.expanded = Some(id);
        id
    }

    /// Apply a field-level edit to the item at `index`.
    pub fn update(&mut self, index: usize, edit: impl FnOnce(&mut T)) -> Result<(), CoreError> {
        self.check_index(index)?;
        edit(&mut self.items[index].1);
        Ok(())
    }

    /// Replace the item at `index`, returning the previous one.
    pub fn replace(&mut self, index: usize, item: T) -> Result<T, CoreError> {
        self.check_index(index)?;
        Ok(std::mem::replace(&mut self.items[index].1, item))
    }

    /// Remove the item at `index`. Removing the expanded item collapses it.
    pub fn remove(&mut self, index: usize) -> Result<T, CoreError> {
        self.check_index(index)?;
        let (id, item) = self.items.remove(index);
        if self.expanded == Some(id) {
            self.expanded = None;
        }
        Ok(item)
    }

    /// Move the item at `from` so that it ends up at `to`, shifting the
    /// items in between.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), CoreError> {
        self.check_index(from)?;
        self.check_index(to)?;
        let entry = self.items.remove(from);
        self.items.insert(to, entry);
        Ok(())
    }

    /// Swap the items at positions `a` and `b`.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), CoreError> {
        self.check_index(a)?;
        self.check_index(b)?;
        self.items.swap(a, b);
        Ok(())
    }

    /// Expand the item at `index`, collapsing any other.
    pub fn expand(&mut self, index: usize) -> Result<(), CoreError> {
        self.check_index(index)?;
        self.expanded = Some(self.items[index].0);
        Ok(())
    }

    /// Expand the item at `index`, or collapse it if it is already expanded.
    pub fn toggle(&mut self, index: usize) -> Result<(), CoreError> {
        self.check_index(index)?;
        let id = self.items[index].0;
        self.expanded = if self.expanded == Some(id) {
            None
        } else {
            Some(id)
        };
        Ok(())
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    /// Index of the expanded item, if any.
    pub fn expanded_index(&self) -> Option<usize> {
        self.expanded.and_then(|id| self.position(id))
    }

    /// Consume the list, returning the records in order.
    pub fn into_vec(self) -> Vec<T> {
        self.items.into_iter().map(|(_, item)| item).collect()
    }

    fn insert_tagged(&mut self, item: T) -> ItemId {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push((id, item));
        id
    }

    fn check_index(&self, index: usize) -> Result<(), CoreError> {
        if index >= self.items.len() {
            return Err(CoreError::Validation(format!(
                "Index {index} is out of range for a list of {} items",
                self.items.len()
            )));
        }
        Ok(())
    }
}

impl<T: Serialize> OrderedList<T> {
    /// Serialize the records, in order, to their persisted JSON form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let records: Vec<&T> = self.iter().collect();
        serde_json::to_string(&records)
    }
}

// ---------------------------------------------------------------------------
// Row-level ordering
// ---------------------------------------------------------------------------

/// Pair each id with its zero-based position.
pub fn contiguous_order<I: Copy>(ids: &[I]) -> Vec<(I, i32)> {
    ids.iter()
        .enumerate()
        .map(|(position, id)| (*id, position as i32))
        .collect()
}

/// Check that `requested` lists every id in `existing` exactly once.
pub fn validate_permutation(requested: &[DbId], existing: &[DbId]) -> Result<(), CoreError> {
    let mut requested_sorted = requested.to_vec();
    requested_sorted.sort_unstable();
    let mut existing_sorted = existing.to_vec();
    existing_sorted.sort_unstable();

    if requested_sorted.windows(2).any(|w| w[0] == w[1]) {
        return Err(CoreError::Validation(
            "Order contains duplicate ids".into(),
        ));
    }
    if requested_sorted != existing_sorted {
        return Err(CoreError::Validation(format!(
            "Order must list all {} existing ids exactly once",
            existing.len()
        )));
    }
    Ok(())
}
