//! Mutation Coordinator
//!
//! Drives one remote deletion at a time and applies it to the sparse store.
//! Every applied deletion bumps the generation so fetches requested against
//! the old indices are dropped on arrival.

use super::data_source::Keyed;
use super::store::SparseStore;
use crate::error::{Error, Result};

/// A removal waiting for the remote delete to resolve
#[derive(Clone, Debug)]
pub struct RemovalTicket<T: Keyed> {
    /// Index the item occupied when the removal was requested
    pub index: usize,
    pub key: T::Key,
    pub item: T,
    pub generation: u64,
}

/// What a successful removal did to the local store
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemovalEffect {
    /// Slot spliced out at this index
    Spliced(usize),
    /// Item was no longer cached; loaded slots were dropped and the total decremented
    Invalidated,
    /// Store was reloaded while the delete was in flight
    Superseded,
}

#[derive(Debug, Default)]
pub struct MutationCoordinator {
    generation: u64,
    in_flight: bool,
}

impl MutationCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Invalidate every fetch requested so far
    pub fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Start removing the item at `index`
    ///
    /// Returns `Ok(None)` when nothing is loaded there, so repeated clicks on a
    /// vanished row do nothing.
    pub fn begin<T: Keyed + Clone>(
        &mut self,
        store: &SparseStore<T>,
        index: usize,
    ) -> Result<Option<RemovalTicket<T>>> {
        let Some(item) = store.get(index) else {
            tracing::debug!(index, "Removal requested on unloaded slot, ignoring");
            return Ok(None);
        };
        if self.in_flight {
            return Err(Error::RemovalInProgress);
        }

        self.in_flight = true;
        Ok(Some(RemovalTicket {
            index,
            key: item.key(),
            item: item.clone(),
            generation: self.generation,
        }))
    }

    /// Apply the remote outcome of a removal
    ///
    /// On failure the store is untouched and the error is handed back.
    pub fn complete<T: Keyed>(
        &mut self,
        store: &mut SparseStore<T>,
        ticket: &RemovalTicket<T>,
        outcome: Result<()>,
    ) -> Result<RemovalEffect> {
        self.in_flight = false;
        outcome?;

        let stale = ticket.generation != self.generation;
        self.bump();

        if stale {
            return Ok(RemovalEffect::Superseded);
        }

        let position = match store.get(ticket.index) {
            Some(item) if item.key() == ticket.key => Some(ticket.index),
            _ => store.position_of(&ticket.key),
        };

        match position {
            Some(index) => {
                store.remove_shift(index);
                Ok(RemovalEffect::Spliced(index))
            }
            None => {
                store.forget_removed();
                Ok(RemovalEffect::Invalidated)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::virtual_list::store::TotalCount;

    #[derive(Clone, Debug, PartialEq)]
    struct Row(u32);

    impl Keyed for Row {
        type Key = u32;

        fn key(&self) -> u32 {
            self.0
        }
    }

    fn store_with(n: u32, total: usize) -> SparseStore<Row> {
        let mut store = SparseStore::new();
        store.merge_page(0, (0..n).map(Row).collect(), total);
        store
    }

    #[test]
    fn successful_removal_splices_and_bumps_generation() {
        let mut coordinator = MutationCoordinator::new();
        let mut store = store_with(100, 250);

        let ticket = coordinator.begin(&store, 5).expect("begin").expect("ticket");
        assert_eq!(ticket.key, 5);

        let effect = coordinator
            .complete(&mut store, &ticket, Ok(()))
            .expect("complete");
        assert_eq!(effect, RemovalEffect::Spliced(5));
        assert_eq!(coordinator.generation(), 1);
        assert_eq!(store.total(), TotalCount::Known(249));
        assert_eq!(store.get(5), Some(&Row(6)));
        assert!(!store.is_loaded(99));
    }

    #[test]
    fn failed_removal_leaves_store_untouched() {
        let mut coordinator = MutationCoordinator::new();
        let mut store = store_with(10, 10);

        let ticket = coordinator.begin(&store, 3).expect("begin").expect("ticket");
        let err = coordinator
            .complete(&mut store, &ticket, Err(Error::delete_failed("denied")))
            .expect_err("should fail");

        assert!(matches!(err, Error::DeleteFailed { .. }));
        assert_eq!(coordinator.generation(), 0);
        assert!(!coordinator.is_in_flight());
        assert_eq!(store.get(3), Some(&Row(3)));
        assert_eq!(store.total(), TotalCount::Known(10));
    }

    #[test]
    fn removal_on_hole_is_noop_twice() {
        let mut coordinator = MutationCoordinator::new();
        let store = store_with(10, 50);

        assert!(coordinator.begin(&store, 20).expect("begin").is_none());
        assert!(coordinator.begin(&store, 20).expect("begin").is_none());
        assert!(!coordinator.is_in_flight());
    }

    #[test]
    fn second_removal_while_in_flight_is_rejected() {
        let mut coordinator = MutationCoordinator::new();
        let store = store_with(10, 10);

        let _ticket = coordinator.begin(&store, 1).expect("begin");
        assert!(matches!(
            coordinator.begin(&store, 2),
            Err(Error::RemovalInProgress)
        ));
    }

    #[test]
    fn moved_item_is_found_by_key() {
        let mut coordinator = MutationCoordinator::new();
        let mut store = store_with(10, 10);

        let ticket = coordinator.begin(&store, 4).expect("begin").expect("ticket");
        // Server-side shift observed through a fresh page before the delete resolved
        store.merge_page(0, vec![Row(100), Row(0), Row(1), Row(2), Row(3), Row(4)], 11);

        let effect = coordinator
            .complete(&mut store, &ticket, Ok(()))
            .expect("complete");
        assert_eq!(effect, RemovalEffect::Spliced(5));
        assert_eq!(store.position_of(&4), None);
    }

    #[test]
    fn uncached_item_invalidates_loaded_slots() {
        let mut coordinator = MutationCoordinator::new();
        let mut store = store_with(10, 10);

        let ticket = coordinator.begin(&store, 4).expect("begin").expect("ticket");
        store.merge_page(0, (20..30).map(Row).collect(), 10);

        let effect = coordinator
            .complete(&mut store, &ticket, Ok(()))
            .expect("complete");
        assert_eq!(effect, RemovalEffect::Invalidated);
        assert_eq!(store.loaded_len(), 0);
        assert_eq!(store.total(), TotalCount::Known(9));
    }

    #[test]
    fn removal_resolving_after_reload_is_superseded() {
        let mut coordinator = MutationCoordinator::new();
        let mut store = store_with(10, 10);

        let ticket = coordinator.begin(&store, 4).expect("begin").expect("ticket");
        coordinator.bump();
        store.clear();

        let effect = coordinator
            .complete(&mut store, &ticket, Ok(()))
            .expect("complete");
        assert_eq!(effect, RemovalEffect::Superseded);
        assert!(store.total().is_unknown());
        assert_eq!(coordinator.generation(), 2);
    }
}
