//! ListSource Trait
//!
//! Abstraction for the remote capabilities a virtual list consumes: fetching
//! an aligned page and deleting a single item.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{self, BoxFuture, FutureExt};

use crate::error::{Error, Result};

/// Items carry a stable identity the list uses for deletion
pub trait Keyed {
    type Key: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    fn key(&self) -> Self::Key;
}

/// One page returned by `ListSource::fetch_page`
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    /// Items starting at the requested offset, at most `limit` of them
    pub items: Vec<T>,
    /// Total number of items on the server at response time
    pub total: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize) -> Self {
        Self { items, total }
    }
}

/// Remote capabilities backing a virtual list
///
/// Both calls return `'static` futures so they can be driven on the shared
/// runtime while the list keeps handling scroll events.
pub trait ListSource: Send + Sync + 'static {
    type Item: Keyed + Clone + Send + Sync + 'static;

    /// Fetch up to `limit` items starting at `offset`
    fn fetch_page(&self, offset: usize, limit: usize)
    -> BoxFuture<'static, Result<Page<Self::Item>>>;

    /// Delete one item, identified by the item itself rather than its index
    fn delete_item(&self, item: Self::Item) -> BoxFuture<'static, Result<()>>;
}

/// Simple in-memory source that answers immediately
pub struct VecSource<T> {
    rows: Arc<Mutex<Vec<T>>>,
}

impl<T: Keyed + Clone + Send + Sync + 'static> VecSource<T> {
    /// Create a new VecSource
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
        }
    }

    /// Number of rows currently held
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all rows
    pub fn all(&self) -> Vec<T> {
        self.lock().clone()
    }

    /// Synchronous page read shared by the async capability and wrappers
    pub fn page(&self, offset: usize, limit: usize) -> Page<T> {
        let rows = self.lock();
        let end = offset.saturating_add(limit).min(rows.len());
        let items = rows.get(offset.min(end)..end).map(<[T]>::to_vec).unwrap_or_default();
        Page::new(items, rows.len())
    }

    /// Synchronous delete by key
    pub fn remove(&self, key: &T::Key) -> Result<T> {
        let mut rows = self.lock();
        let Some(position) = rows.iter().position(|row| &row.key() == key) else {
            return Err(Error::delete_failed(format!("{key:?} not found")));
        };
        Ok(rows.remove(position))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<T>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Clone for VecSource<T> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
        }
    }
}

impl<T: Keyed + Clone + Send + Sync + 'static> ListSource for VecSource<T> {
    type Item = T;

    fn fetch_page(&self, offset: usize, limit: usize) -> BoxFuture<'static, Result<Page<T>>> {
        future::ready(Ok(self.page(offset, limit))).boxed()
    }

    fn delete_item(&self, item: T) -> BoxFuture<'static, Result<()>> {
        future::ready(self.remove(&item.key()).map(|_| ())).boxed()
    }
}
