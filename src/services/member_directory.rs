//! Member Directory
//!
//! In-memory stand-in for the members API. Answers page and delete requests
//! after a configurable latency and can be told to reject deletions.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};

use crate::components::virtual_list::{Keyed, ListSource, Page, VecSource};
use crate::domain::Member;
use crate::error::{Error, Result};

/// Members directory backed by memory
pub struct MemberDirectory {
    members: VecSource<Member>,
    latency: Duration,
    reject_deletes: Arc<AtomicBool>,
    fetch_calls: Arc<AtomicUsize>,
}

impl MemberDirectory {
    /// Create a directory holding `members`
    pub fn new(members: Vec<Member>) -> Self {
        Self {
            members: VecSource::new(members),
            latency: Duration::ZERO,
            reject_deletes: Arc::new(AtomicBool::new(false)),
            fetch_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a directory of generated sample members
    pub fn with_sample_members(count: usize) -> Self {
        Self::new(Member::samples(count))
    }

    /// Delay every response by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make subsequent deletes fail (e.g. missing permission on the server)
    pub fn set_reject_deletes(&self, reject: bool) {
        self.reject_deletes.store(reject, Ordering::SeqCst);
    }

    /// Handle for toggling delete rejection after the directory was moved into a list
    pub fn reject_deletes_handle(&self) -> Arc<AtomicBool> {
        self.reject_deletes.clone()
    }

    /// Number of page requests served so far
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl ListSource for MemberDirectory {
    type Item = Member;

    fn fetch_page(&self, offset: usize, limit: usize) -> BoxFuture<'static, Result<Page<Member>>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let members = self.members.clone();
        let latency = self.latency;

        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            tracing::debug!("Serving members {}..{}", offset, offset + limit);
            Ok(members.page(offset, limit))
        }
        .boxed()
    }

    fn delete_item(&self, item: Member) -> BoxFuture<'static, Result<()>> {
        let members = self.members.clone();
        let latency = self.latency;
        let reject = self.reject_deletes.clone();

        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            if reject.load(Ordering::SeqCst) {
                return Err(Error::delete_failed(format!(
                    "not allowed to delete member {}",
                    item.key()
                )));
            }
            members.remove(&item.key())?;
            tracing::info!("Deleted member {} ({})", item.name, item.id);
            Ok(())
        }
        .boxed()
    }
}

impl std::fmt::Debug for MemberDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberDirectory")
            .field("members", &self.len())
            .field("latency", &self.latency)
            .finish()
    }
}
