//! VirtualList Component
//!
//! Mounts a `ListState` over a `ListSource`. Fetches and deletes run on the
//! shared tokio runtime; their completions come back over a channel and are
//! applied on the owning thread by `pump`.
//!
//! ```text
//! on_viewport_changed ──► ListState::viewport_changed ──► fetch_page (tokio)
//!                                                              │
//!        pump ◄── crossbeam channel ◄── Completion::Page ◄─────┘
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use super::config::ListConfig;
use super::data_source::{Keyed, ListSource, Page};
use super::list_state::{ListState, ListStats, ListUpdate};
use super::mutation::RemovalTicket;
use super::scheduler::ChunkTicket;
use super::store::{Slot, TotalCount};
use super::viewport::IndexRange;
use crate::error::Result;
use crate::services::spawn_named_in_tokio;

type Key<S> = <<S as ListSource>::Item as Keyed>::Key;

/// Remote result on its way back to the owning thread
enum Completion<T: Keyed> {
    Page {
        ticket: ChunkTicket,
        result: Result<Page<T>>,
    },
    Removal {
        ticket: RemovalTicket<T>,
        result: Result<()>,
    },
}

/// Viewport-driven lazy list over a remote collection
pub struct VirtualList<S: ListSource> {
    state: ListState<S::Item>,
    source: Arc<S>,
    tx: Sender<Completion<S::Item>>,
    rx: Receiver<Completion<S::Item>>,
    /// Spawned requests whose completion has not been received yet
    outstanding: usize,
}

impl<S: ListSource> VirtualList<S> {
    /// Mount a list; fails on non-positive item height or chunk size
    pub fn mount(source: S, config: ListConfig<S::Item>) -> Result<Self> {
        let state = ListState::new(config)?;
        let (tx, rx) = crossbeam_channel::unbounded();
        tracing::info!(
            chunk_size = state.config().chunk_size,
            item_height = state.config().item_height,
            "Mounted virtual list"
        );
        Ok(Self {
            state,
            source: Arc::new(source),
            tx,
            rx,
            outstanding: 0,
        })
    }

    // ==================== Host API ====================

    /// Scroll or resize happened; fetch whatever the new range is missing
    pub fn on_viewport_changed(
        &mut self,
        scroll_offset: f32,
        viewport_height: f32,
    ) -> Result<IndexRange> {
        let (range, tickets) = self.state.viewport_changed(scroll_offset, viewport_height)?;
        self.dispatch_fetches(tickets);
        Ok(range)
    }

    /// Items or holes for rendering
    pub fn visible_items(&self, lower: usize, upper: usize) -> Vec<(usize, Slot<S::Item>)> {
        self.state.visible_items(lower, upper)
    }

    /// Start removing the item at `index`
    ///
    /// Returns the key being deleted, or `None` when nothing is loaded there.
    /// The remote outcome arrives through `pump` as `Removed` or
    /// `RemovalFailed`.
    pub fn request_removal(&mut self, index: usize) -> Result<Option<Key<S>>> {
        let Some(ticket) = self.state.begin_removal(index)? else {
            return Ok(None);
        };
        let key = ticket.key.clone();

        let request = self.source.delete_item(ticket.item.clone());
        let tx = self.tx.clone();
        let guard = self.state.lifecycle().clone();
        self.outstanding += 1;

        spawn_named_in_tokio("delete_item", async move {
            let result = request.await;
            if guard.is_live() {
                let _ = tx.send(Completion::Removal { ticket, result });
            }
        });

        Ok(Some(key))
    }

    pub fn total_count(&self) -> TotalCount {
        self.state.total_count()
    }

    /// Scrollable extent in pixels
    pub fn content_height(&self) -> f32 {
        self.state.content_height()
    }

    pub fn stats(&self) -> ListStats {
        self.state.stats()
    }

    pub fn state(&self) -> &ListState<S::Item> {
        &self.state
    }

    /// Drop the cache, e.g. after the host changed its query
    pub fn reload(&mut self) -> Result<()> {
        self.state.reload()?;
        let tickets = self.state.replan();
        self.dispatch_fetches(tickets);
        Ok(())
    }

    /// Unmount; results still in flight are discarded
    pub fn teardown(&mut self) {
        self.state.teardown();
        while self.rx.try_recv().is_ok() {}
        self.outstanding = 0;
    }

    // ==================== Completions ====================

    /// Apply every completion that has arrived, without blocking
    pub fn pump(&mut self) -> Vec<ListUpdate<Key<S>>> {
        let mut updates = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            self.outstanding = self.outstanding.saturating_sub(1);
            updates.extend(self.apply(completion));
        }
        updates
    }

    /// Block until every outstanding request resolved or `timeout` elapsed
    pub fn wait_idle(&mut self, timeout: Duration) -> Vec<ListUpdate<Key<S>>> {
        let deadline = Instant::now() + timeout;
        let mut updates = self.pump();

        while self.outstanding > 0 && self.state.lifecycle().is_live() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(completion) => {
                    self.outstanding -= 1;
                    updates.extend(self.apply(completion));
                }
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(
                        outstanding = self.outstanding,
                        "Timed out waiting for list requests"
                    );
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        updates
    }

    fn apply(&mut self, completion: Completion<S::Item>) -> Option<ListUpdate<Key<S>>> {
        let update = match completion {
            Completion::Page { ticket, result } => self.state.apply_page(ticket, result),
            Completion::Removal { ticket, result } => self.state.finish_removal(ticket, result),
        };

        // Dropped pages and fetches held back during a removal leave visible
        // holes that no scroll event will refill
        if matches!(
            update,
            Some(
                ListUpdate::PageDropped { .. }
                    | ListUpdate::Removed { .. }
                    | ListUpdate::RemovalFailed { .. }
            )
        ) {
            let tickets = self.state.replan();
            self.dispatch_fetches(tickets);
        }

        update
    }

    fn dispatch_fetches(&mut self, tickets: Vec<ChunkTicket>) {
        for ticket in tickets {
            let request = self.source.fetch_page(ticket.offset, ticket.limit);
            let tx = self.tx.clone();
            let guard = self.state.lifecycle().clone();
            self.outstanding += 1;

            spawn_named_in_tokio("fetch_page", async move {
                let result = request.await;
                if guard.is_live() {
                    let _ = tx.send(Completion::Page { ticket, result });
                }
            });
        }
    }
}

impl<S: ListSource> Drop for VirtualList<S> {
    fn drop(&mut self) {
        self.state.teardown();
    }
}

impl<S: ListSource> std::fmt::Debug for VirtualList<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualList")
            .field("stats", &self.stats())
            .field("outstanding", &self.outstanding)
            .finish()
    }
}
