//! ListState - Windowed Collection State
//!
//! Owns the store, scheduler, mutation coordinator and lifecycle guard of one
//! mounted list. It performs no I/O: callers hand it viewport changes and
//! remote results, and it hands back the fetches and deletes to perform.

use serde::Serialize;

use super::config::ListConfig;
use super::data_source::{Keyed, Page};
use super::lifecycle::LifecycleGuard;
use super::mutation::{MutationCoordinator, RemovalEffect, RemovalTicket};
use super::scheduler::{ChunkScheduler, ChunkTicket};
use super::store::{Slot, SparseStore, TotalCount};
use super::viewport::{IndexRange, visible_range};
use crate::error::{Error, Result};

/// Change applied (or refused) as a remote result came back
#[derive(Debug)]
pub enum ListUpdate<K> {
    /// Page written into the store
    PageMerged {
        chunk: usize,
        offset: usize,
        received: usize,
        total: usize,
    },
    /// Fetch failed; the chunk stays a hole until it is visible again
    PageFailed { chunk: usize, error: Error },
    /// Page requested before a deletion or reload, or landing while a
    /// deletion was in flight, discarded
    PageDropped { chunk: usize, generation: u64 },
    /// Deletion confirmed and applied locally
    Removed { key: K, effect: RemovalEffect },
    /// Deletion rejected remotely, nothing changed
    RemovalFailed { index: usize, key: K, error: Error },
}

impl<K> ListUpdate<K> {
    /// Whether the host should re-render
    pub fn needs_render(&self) -> bool {
        matches!(self, Self::PageMerged { .. } | Self::Removed { .. })
    }
}

/// Diagnostics snapshot
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListStats {
    pub total: TotalCount,
    pub loaded: usize,
    pub pending_chunks: usize,
    pub generation: u64,
    pub removal_in_flight: bool,
    pub torn_down: bool,
}

pub struct ListState<T: Keyed> {
    config: ListConfig<T>,
    store: SparseStore<T>,
    scheduler: ChunkScheduler,
    mutations: MutationCoordinator,
    lifecycle: LifecycleGuard,
    last_viewport: Option<(f32, f32)>,
}

impl<T: Keyed + Clone> ListState<T> {
    /// Create the state of a freshly mounted list
    pub fn new(config: ListConfig<T>) -> Result<Self> {
        config.validate()?;
        let scheduler = ChunkScheduler::new(config.chunk_size);
        Ok(Self {
            config,
            store: SparseStore::new(),
            scheduler,
            mutations: MutationCoordinator::new(),
            lifecycle: LifecycleGuard::new(),
            last_viewport: None,
        })
    }

    // ==================== Getters ====================

    pub fn config(&self) -> &ListConfig<T> {
        &self.config
    }

    pub fn store(&self) -> &SparseStore<T> {
        &self.store
    }

    pub fn lifecycle(&self) -> &LifecycleGuard {
        &self.lifecycle
    }

    pub fn generation(&self) -> u64 {
        self.mutations.generation()
    }

    pub fn total_count(&self) -> TotalCount {
        self.store.total()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Whether the empty placeholder row is currently shown
    pub fn shows_placeholder(&self) -> bool {
        self.store.is_empty() && self.config.empty_placeholder.is_some()
    }

    /// Scrollable extent in pixels
    pub fn content_height(&self) -> f32 {
        let rows = match self.store.total() {
            TotalCount::Known(0) if self.shows_placeholder() => 1,
            TotalCount::Known(n) => n,
            TotalCount::Unknown => 0,
        };
        rows as f32 * self.config.item_height
    }

    /// Items or holes to render for `[lower, upper]`
    ///
    /// Indices at or past a known total are omitted. While the total is
    /// unknown at most one chunk of holes is returned. An empty collection
    /// with a configured placeholder yields exactly one placeholder row.
    pub fn visible_items(&self, lower: usize, upper: usize) -> Vec<(usize, Slot<T>)> {
        if self.store.is_empty() {
            return match &self.config.empty_placeholder {
                Some(placeholder) if lower == 0 => vec![(0, Slot::Placeholder(placeholder.clone()))],
                _ => Vec::new(),
            };
        }

        let range = IndexRange::new(lower, upper);
        let upper = match self.store.total().known() {
            Some(total) if range.lower >= total => return Vec::new(),
            Some(total) => range.upper.min(total - 1),
            None => range
                .upper
                .min(range.lower.saturating_add(self.config.chunk_size - 1)),
        };

        self.store
            .read_range(IndexRange::new(range.lower, upper))
            .into_iter()
            .map(|(index, slot)| (index, slot.map(T::clone)))
            .collect()
    }

    pub fn stats(&self) -> ListStats {
        ListStats {
            total: self.store.total(),
            loaded: self.store.loaded_len(),
            pending_chunks: self.scheduler.pending_len(),
            generation: self.mutations.generation(),
            removal_in_flight: self.mutations.is_in_flight(),
            torn_down: !self.lifecycle.is_live(),
        }
    }

    // ==================== Scheduling ====================

    /// Record new viewport geometry and return the fetches it needs
    ///
    /// Nothing is fetched while a removal is in flight; the host re-plans
    /// once it resolves.
    pub fn viewport_changed(
        &mut self,
        scroll_offset: f32,
        viewport_height: f32,
    ) -> Result<(IndexRange, Vec<ChunkTicket>)> {
        self.lifecycle.check()?;
        let range = visible_range(scroll_offset, viewport_height, self.config.item_height)?;
        self.last_viewport = Some((scroll_offset, viewport_height));
        if self.mutations.is_in_flight() {
            return Ok((range, Vec::new()));
        }
        let tickets = self
            .scheduler
            .plan(range, &self.store, self.mutations.generation());
        Ok((range, tickets))
    }

    /// Re-plan against the last reported viewport
    pub fn replan(&mut self) -> Vec<ChunkTicket> {
        let Some((scroll_offset, viewport_height)) = self.last_viewport else {
            return Vec::new();
        };
        self.viewport_changed(scroll_offset, viewport_height)
            .map(|(_, tickets)| tickets)
            .unwrap_or_default()
    }

    /// Apply the result of a chunk fetch
    ///
    /// Returns `None` after teardown. The chunk leaves the pending set whatever
    /// the outcome. Pages from an older generation are dropped, and so is
    /// any page landing while a removal is in flight since it may already
    /// reflect the deletion.
    pub fn apply_page(
        &mut self,
        ticket: ChunkTicket,
        result: Result<Page<T>>,
    ) -> Option<ListUpdate<T::Key>> {
        if !self.lifecycle.is_live() {
            return None;
        }
        self.scheduler.settle(&ticket);

        if ticket.generation != self.mutations.generation() || self.mutations.is_in_flight() {
            tracing::warn!(
                chunk = ticket.chunk,
                requested = ticket.generation,
                current = self.mutations.generation(),
                removal_in_flight = self.mutations.is_in_flight(),
                "Dropping page fetched before the list changed"
            );
            return Some(ListUpdate::PageDropped {
                chunk: ticket.chunk,
                generation: ticket.generation,
            });
        }

        match result {
            Ok(Page { mut items, total }) => {
                items.truncate(ticket.limit);
                let received = items.len();
                self.store.merge_page(ticket.offset, items, total);
                tracing::debug!(chunk = ticket.chunk, received, total, "Merged page");
                Some(ListUpdate::PageMerged {
                    chunk: ticket.chunk,
                    offset: ticket.offset,
                    received,
                    total,
                })
            }
            Err(error) => {
                tracing::warn!(chunk = ticket.chunk, "Chunk fetch failed: {}", error);
                Some(ListUpdate::PageFailed {
                    chunk: ticket.chunk,
                    error,
                })
            }
        }
    }

    // ==================== Mutations ====================

    /// Start removing the item at `index`; `Ok(None)` when nothing is loaded there
    pub fn begin_removal(&mut self, index: usize) -> Result<Option<RemovalTicket<T>>> {
        self.lifecycle.check()?;
        self.mutations.begin(&self.store, index)
    }

    /// Apply the remote outcome of a removal; `None` after teardown
    pub fn finish_removal(
        &mut self,
        ticket: RemovalTicket<T>,
        outcome: Result<()>,
    ) -> Option<ListUpdate<T::Key>> {
        if !self.lifecycle.is_live() {
            return None;
        }

        match self.mutations.complete(&mut self.store, &ticket, outcome) {
            Ok(effect) => {
                tracing::info!(key = ?ticket.key, ?effect, "Removed item");
                Some(ListUpdate::Removed {
                    key: ticket.key,
                    effect,
                })
            }
            Err(error) => {
                tracing::warn!(key = ?ticket.key, "Removal failed: {}", error);
                Some(ListUpdate::RemovalFailed {
                    index: ticket.index,
                    key: ticket.key,
                    error,
                })
            }
        }
    }

    // ==================== Lifecycle ====================

    /// Forget every cached slot, the total and the pending chunks
    ///
    /// Outstanding pages will be dropped on arrival.
    pub fn reload(&mut self) -> Result<()> {
        self.lifecycle.check()?;
        self.store.clear();
        self.scheduler.clear();
        let generation = self.mutations.bump();
        tracing::info!(generation, "Reloading list");
        Ok(())
    }

    pub fn teardown(&self) {
        self.lifecycle.teardown();
    }
}
