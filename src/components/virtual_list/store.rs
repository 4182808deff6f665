//! Sparse Collection Store
//!
//! Index-addressed cache of loaded items plus the authoritative total count.
//! A missing index means "not loaded yet", never "does not exist".

use std::collections::BTreeMap;

use serde::Serialize;

use super::data_source::Keyed;
use super::viewport::IndexRange;

/// Server-side item count as known to the list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum TotalCount {
    /// No page response has arrived yet
    #[default]
    Unknown,
    Known(usize),
}

impl TotalCount {
    pub fn known(&self) -> Option<usize> {
        match self {
            Self::Unknown => None,
            Self::Known(n) => Some(*n),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// One rendered position in the list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot<T> {
    /// Item present in the cache
    Loaded(T),
    /// Index exists (or may exist) but has not been fetched
    Hole,
    /// Synthetic entry shown when the collection is empty
    Placeholder(T),
}

impl<T> Slot<T> {
    pub fn is_hole(&self) -> bool {
        matches!(self, Self::Hole)
    }

    /// The loaded item, if any
    pub fn loaded(self) -> Option<T> {
        match self {
            Self::Loaded(item) => Some(item),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Slot<U> {
        match self {
            Self::Loaded(item) => Slot::Loaded(f(item)),
            Self::Hole => Slot::Hole,
            Self::Placeholder(item) => Slot::Placeholder(f(item)),
        }
    }
}

/// Sparse cache of a remote collection
#[derive(Clone, Debug)]
pub struct SparseStore<T> {
    items: BTreeMap<usize, T>,
    total: TotalCount,
}

impl<T> SparseStore<T> {
    /// Create an empty store with an unknown total
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            total: TotalCount::Unknown,
        }
    }

    // ==================== Getters ====================

    pub fn total(&self) -> TotalCount {
        self.total
    }

    /// True iff the server reported zero items
    pub fn is_empty(&self) -> bool {
        self.total == TotalCount::Known(0)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(&index)
    }

    pub fn is_loaded(&self, index: usize) -> bool {
        self.items.contains_key(&index)
    }

    /// Number of loaded slots
    pub fn loaded_len(&self) -> usize {
        self.items.len()
    }

    /// Highest index holding an item
    pub fn highest_loaded(&self) -> Option<usize> {
        self.items.last_key_value().map(|(index, _)| *index)
    }

    /// Loaded items or hole markers for every index in the range
    pub fn read_range(&self, range: IndexRange) -> Vec<(usize, Slot<&T>)> {
        range
            .iter()
            .map(|index| {
                let slot = match self.items.get(&index) {
                    Some(item) => Slot::Loaded(item),
                    None => Slot::Hole,
                };
                (index, slot)
            })
            .collect()
    }

    // ==================== Mutations ====================

    /// Write a page at `offset` and adopt the reported total
    ///
    /// Last write wins per slot. Slots at or beyond the reported total are
    /// dropped so no loaded index exceeds the known count.
    pub fn merge_page(&mut self, offset: usize, received: Vec<T>, reported_total: usize) {
        for (k, item) in received.into_iter().enumerate() {
            self.items.insert(offset + k, item);
        }
        self.total = TotalCount::Known(reported_total);
        self.items.retain(|index, _| *index < reported_total);
    }

    /// Remove slot `index` and shift every later slot down by one
    ///
    /// Returns `None` without touching anything when the slot is a hole.
    pub fn remove_shift(&mut self, index: usize) -> Option<T> {
        let removed = self.items.remove(&index)?;
        let tail = self.items.split_off(&index);
        self.items
            .extend(tail.into_iter().map(|(position, item)| (position - 1, item)));
        if let TotalCount::Known(n) = self.total {
            self.total = TotalCount::Known(n.saturating_sub(1));
        }
        Some(removed)
    }

    /// Drop every loaded slot and forget the total
    pub fn clear(&mut self) {
        self.items.clear();
        self.total = TotalCount::Unknown;
    }

    /// Account for a removal whose slot is not cached
    ///
    /// Loaded indices can no longer be trusted, so every slot becomes a hole.
    pub fn forget_removed(&mut self) {
        self.items.clear();
        if let TotalCount::Known(n) = self.total {
            self.total = TotalCount::Known(n.saturating_sub(1));
        }
    }
}

impl<T: Keyed> SparseStore<T> {
    /// Current index of the item with `key`, if it is loaded
    pub fn position_of(&self, key: &T::Key) -> Option<usize> {
        self.items
            .iter()
            .find(|(_, item)| &item.key() == key)
            .map(|(index, _)| *index)
    }
}

impl<T> Default for SparseStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merged(chunks: &[(usize, std::ops::Range<u32>)], total: usize) -> SparseStore<u32> {
        let mut store = SparseStore::new();
        for (offset, values) in chunks {
            store.merge_page(*offset, values.clone().collect(), total);
        }
        store
    }

    fn loaded_values(store: &SparseStore<u32>, range: IndexRange) -> Vec<Option<u32>> {
        store
            .read_range(range)
            .into_iter()
            .map(|(_, slot)| slot.loaded().copied())
            .collect()
    }

    #[test]
    fn new_store_has_unknown_total() {
        let store: SparseStore<u32> = SparseStore::new();
        assert!(store.total().is_unknown());
        assert!(!store.is_empty());
        assert_eq!(store.highest_loaded(), None);
    }

    #[test]
    fn disjoint_merges_read_back_with_holes() {
        let store = merged(&[(0, 0..10), (20, 20..30)], 40);
        assert_eq!(store.total(), TotalCount::Known(40));

        let slots = loaded_values(&store, IndexRange::new(0, 39));
        for (index, slot) in slots.iter().enumerate() {
            let expected = (index < 10 || (20..30).contains(&index)).then_some(index as u32);
            assert_eq!(*slot, expected, "index {index}");
        }
    }

    #[test]
    fn later_merge_overwrites_slot_and_total() {
        let mut store = merged(&[(0, 0..10)], 10);
        store.merge_page(0, vec![100, 101], 12);
        assert_eq!(store.get(0), Some(&100));
        assert_eq!(store.get(2), Some(&2));
        assert_eq!(store.total(), TotalCount::Known(12));
    }

    #[test]
    fn shrinking_total_drops_out_of_range_slots() {
        let mut store = merged(&[(0, 0..10)], 10);
        store.merge_page(0, vec![0, 1, 2], 3);
        assert_eq!(store.loaded_len(), 3);
        assert_eq!(store.highest_loaded(), Some(2));
    }

    #[test]
    fn remove_shift_moves_tail_down_and_opens_hole() {
        let mut store = merged(&[(0, 0..100)], 250);

        let removed = store.remove_shift(5);
        assert_eq!(removed, Some(5));
        assert_eq!(store.total(), TotalCount::Known(249));
        assert_eq!(store.get(4), Some(&4));
        assert_eq!(store.get(5), Some(&6));
        assert_eq!(store.get(98), Some(&99));
        assert!(!store.is_loaded(99));
    }

    #[test]
    fn remove_shift_keeps_gaps_in_place_relative_to_items() {
        let mut store = merged(&[(0, 0..3), (5, 5..7)], 10);
        store.remove_shift(1);
        assert_eq!(
            loaded_values(&store, IndexRange::new(0, 6)),
            vec![Some(0), Some(2), None, None, Some(5), Some(6), None]
        );
    }

    #[test]
    fn remove_shift_on_hole_is_noop() {
        let mut store = merged(&[(0, 0..3)], 10);
        assert_eq!(store.remove_shift(7), None);
        assert_eq!(store.total(), TotalCount::Known(10));
        assert_eq!(store.loaded_len(), 3);
    }

    #[test]
    fn removing_last_item_empties_store() {
        let mut store = merged(&[(0, 0..1)], 1);
        store.remove_shift(0);
        assert!(store.is_empty());
        assert_eq!(store.total(), TotalCount::Known(0));
    }
}
