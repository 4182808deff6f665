//! Lifecycle Guard
//!
//! Teardown flag shared between a mounted list and the tasks it spawned.
//! Late results are discarded once the flag is set; the underlying requests
//! are left to finish on their own.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};

#[derive(Clone, Debug, Default)]
pub struct LifecycleGuard {
    torn_down: Arc<AtomicBool>,
}

impl LifecycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the owner as unmounted. Idempotent.
    pub fn teardown(&self) {
        if !self.torn_down.swap(true, Ordering::SeqCst) {
            tracing::debug!("List torn down, late results will be discarded");
        }
    }

    pub fn is_live(&self) -> bool {
        !self.torn_down.load(Ordering::SeqCst)
    }

    /// Fail with `TornDown` once the owner is gone
    pub fn check(&self) -> Result<()> {
        if self.is_live() {
            Ok(())
        } else {
            Err(Error::TornDown)
        }
    }

    /// Run `f` only while the owner is still mounted
    pub fn guard<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        self.is_live().then(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_observe_teardown() {
        let guard = LifecycleGuard::new();
        let task_side = guard.clone();
        assert!(task_side.is_live());

        guard.teardown();
        guard.teardown();

        assert!(!task_side.is_live());
        assert!(matches!(task_side.check(), Err(Error::TornDown)));
        assert_eq!(task_side.guard(|| 1), None);
    }
}
