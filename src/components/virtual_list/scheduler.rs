//! Chunk Scheduler
//!
//! Turns a visible index range into aligned chunk fetches, keeping at most
//! one fetch per chunk pending in the current generation.

use ahash::AHashMap;

use super::store::SparseStore;
use super::viewport::IndexRange;

/// An outstanding fetch, tagged with the generation it was requested under
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkTicket {
    pub chunk: usize,
    pub offset: usize,
    pub limit: usize,
    pub generation: u64,
}

#[derive(Debug)]
pub struct ChunkScheduler {
    chunk_size: usize,
    /// Pending chunk -> generation it was requested under
    pending: AHashMap<usize, u64>,
}

impl ChunkScheduler {
    /// `chunk_size` must be positive, `ListConfig::validate` checks it
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            pending: AHashMap::new(),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Chunk holding `index`
    pub fn chunk_of(&self, index: usize) -> usize {
        index / self.chunk_size
    }

    pub fn is_pending(&self, chunk: usize) -> bool {
        self.pending.contains_key(&chunk)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Select and mark pending every chunk the range needs
    ///
    /// A chunk is skipped when its first slot is loaded, when it is already
    /// pending, or when it starts at or past a known total. With an unknown
    /// total every intersecting chunk is eligible.
    pub fn plan<T>(
        &mut self,
        range: IndexRange,
        store: &SparseStore<T>,
        generation: u64,
    ) -> Vec<ChunkTicket> {
        let total = store.total().known();
        let mut tickets = Vec::new();

        for chunk in self.chunk_of(range.lower)..=self.chunk_of(range.upper) {
            let offset = chunk * self.chunk_size;
            if total.is_some_and(|total| offset >= total) {
                break;
            }
            if store.is_loaded(offset) || self.pending.contains_key(&chunk) {
                continue;
            }
            self.pending.insert(chunk, generation);

            tracing::debug!(chunk, offset, generation, "Scheduling chunk fetch");
            tickets.push(ChunkTicket {
                chunk,
                offset,
                limit: self.chunk_size,
                generation,
            });
        }

        tickets
    }

    /// Release a chunk once its response arrived, whatever the outcome
    ///
    /// A response from an older generation leaves a newer request for the
    /// same chunk pending.
    pub fn settle(&mut self, ticket: &ChunkTicket) -> bool {
        if self.pending.get(&ticket.chunk) != Some(&ticket.generation) {
            return false;
        }
        self.pending.remove(&ticket.chunk).is_some()
    }

    /// Forget every pending chunk; their responses will be dropped as stale
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
